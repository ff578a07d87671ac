use serde_json::Value;

use crate::types::IntentUpdate;

#[derive(Debug, PartialEq)]
pub enum ParsedClientMessage {
    Input(IntentUpdate),
    Ping { t: f64 },
}

// Intent frames are merged field-by-field and never rejected: a wrong-typed
// or non-finite field is treated as absent, leaving prior intent in place.
pub fn parse_client_message(raw: &str) -> Option<ParsedClientMessage> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;
    let message_type = object.get("type")?.as_str()?;

    match message_type {
        "input" => Some(ParsedClientMessage::Input(IntentUpdate {
            move_up: bool_field(object.get("moveUp")),
            move_down: bool_field(object.get("moveDown")),
            move_left: bool_field(object.get("moveLeft")),
            move_right: bool_field(object.get("moveRight")),
            fire: bool_field(object.get("fire")),
            erase: bool_field(object.get("erase")),
            aim_angle: finite_f32_field(object.get("aimAngle")),
        })),
        "ping" => {
            let t = object.get("t")?.as_f64()?;
            if !t.is_finite() {
                return None;
            }
            Some(ParsedClientMessage::Ping { t })
        }
        _ => None,
    }
}

fn bool_field(value: Option<&Value>) -> Option<bool> {
    value.and_then(Value::as_bool)
}

fn finite_f32_field(value: Option<&Value>) -> Option<f32> {
    let number = value.and_then(Value::as_f64)?;
    if number.is_finite() {
        Some(number as f32)
    } else {
        None
    }
}
