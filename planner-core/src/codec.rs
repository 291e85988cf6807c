//! Share codes.
//!
//! A share code is `PCWSTRAT-` followed by the plan's JSON compressed with the
//! LZ-String "encoded URI component" alphabet, so it survives copy/paste and
//! can be dropped into a URL as-is.
//!
//! ```text
//! Plan ──serde_json──▶ JSON ──lz-str──▶ payload ──prefix──▶ PCWSTRAT-payload
//! ```

use crate::{Plan, PlannerError, PlannerResult};

/// Literal tag identifying the payload format.
pub const SHARE_CODE_PREFIX: &str = "PCWSTRAT-";

/// Encode a plan as a share code.
///
/// # Errors
///
/// Returns [`PlannerError::Serialization`] if the plan cannot be serialized
/// (for example a non-finite coordinate).
pub fn encode_plan(plan: &Plan) -> PlannerResult<String> {
    let json = serde_json::to_string(plan)?;
    let payload = lz_str::compress_to_encoded_uri_component(json.as_str());
    tracing::debug!(
        json_len = json.len(),
        code_len = payload.len() + SHARE_CODE_PREFIX.len(),
        "Encoded plan"
    );
    Ok(format!("{SHARE_CODE_PREFIX}{payload}"))
}

/// Decode a share code into a fresh plan.
///
/// Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`PlannerError::InvalidPlanCode`] when the prefix is missing, the
/// payload does not decompress, or the JSON does not describe a plan.
pub fn decode_plan(code: &str) -> PlannerResult<Plan> {
    let Some(payload) = code.trim().strip_prefix(SHARE_CODE_PREFIX) else {
        tracing::warn!("Share code rejected: missing {SHARE_CODE_PREFIX} prefix");
        return Err(PlannerError::InvalidPlanCode);
    };

    let Some(wide) = lz_str::decompress_from_encoded_uri_component(payload) else {
        tracing::warn!("Share code rejected: payload does not decompress");
        return Err(PlannerError::InvalidPlanCode);
    };

    let json = String::from_utf16(&wide).map_err(|e| {
        tracing::warn!("Share code rejected: payload is not UTF-16: {e}");
        PlannerError::InvalidPlanCode
    })?;

    serde_json::from_str(&json).map_err(|e| {
        tracing::warn!("Share code rejected: {e}");
        PlannerError::InvalidPlanCode
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Item, Layer, Point, Shape, Style};

    fn sample_plan() -> Plan {
        let mut layer = Layer::new("Layer 1");
        layer.items.push(Item::new(
            Shape::Arrow {
                x1: 10.25,
                y1: 20.5,
                x2: 300.125,
                y2: 40.0,
            },
            Style::new("#ff8300", 3.0, 0.75),
        ));
        layer.items.push(
            Item::new(
                Shape::Path {
                    points: vec![Point::new(1.0, 2.0), Point::new(3.3, 4.4)],
                },
                Style::new("#00ff00", 5.0, 1.0),
            )
            .with_angle(0.3),
        );
        let mut plan = Plan::new("scarred_city");
        plan.title = "Rush B".to_string();
        plan.layers.push(layer);
        plan
    }

    #[test]
    fn test_code_has_prefix_and_is_url_safe() {
        let code = encode_plan(&sample_plan()).expect("encode");
        assert!(code.starts_with(SHARE_CODE_PREFIX));
        assert!(code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "+-$_".contains(c)));
    }

    #[test]
    fn test_round_trip() {
        let plan = sample_plan();
        let decoded = decode_plan(&encode_plan(&plan).expect("encode")).expect("decode");
        assert_eq!(decoded, plan);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            decode_plan("garbage"),
            Err(PlannerError::InvalidPlanCode)
        ));
        assert!(matches!(
            decode_plan("PCWSTRAT-"),
            Err(PlannerError::InvalidPlanCode)
        ));
        assert!(matches!(
            decode_plan("PCWSTRAT-!!!not-a-payload!!!"),
            Err(PlannerError::InvalidPlanCode)
        ));
    }

    #[test]
    fn test_rejects_valid_payload_with_wrong_json() {
        let payload = lz_str::compress_to_encoded_uri_component(r#"{"hello":"world"}"#);
        let code = format!("{SHARE_CODE_PREFIX}{payload}");
        assert!(matches!(
            decode_plan(&code),
            Err(PlannerError::InvalidPlanCode)
        ));
    }

    #[test]
    fn test_accepts_surrounding_whitespace() {
        let plan = sample_plan();
        let code = format!("  {}\n", encode_plan(&plan).expect("encode"));
        assert_eq!(decode_plan(&code).expect("decode"), plan);
    }

    fn code_for(json: &str) -> String {
        let payload = lz_str::compress_to_encoded_uri_component(json);
        format!("{SHARE_CODE_PREFIX}{payload}")
    }

    #[test]
    fn test_rect_height_accepted_under_long_name() {
        let json = r##"{"map":"nord_oko","layers":[{"name":"Layer 1","visible":true,"drawing":[
            {"type":"rect","x":10,"y":20,"w":30,"height":40,"color":"#fff","width":3,"opacity":1}
        ]}],"createdAt":"2025-05-01T12:00:00.000Z"}"##;
        let plan = decode_plan(&code_for(json)).expect("decode");
        assert_eq!(
            plan.layers[0].items[0].shape,
            Shape::Rect {
                x: 10.0,
                y: 20.0,
                width: 30.0,
                height: 40.0
            }
        );
    }

    #[test]
    fn test_rect_without_own_width_is_rejected() {
        // Only the stroke width survives under `width`; the rectangle's own is gone.
        let json = r##"{"map":"nord_oko","layers":[{"name":"Layer 1","visible":true,"drawing":[
            {"type":"rect","x":10,"y":20,"height":40,"color":"#fff","width":3,"opacity":1}
        ]}],"createdAt":"2025-05-01T12:00:00.000Z"}"##;
        assert!(matches!(
            decode_plan(&code_for(json)),
            Err(PlannerError::InvalidPlanCode)
        ));
    }
}
