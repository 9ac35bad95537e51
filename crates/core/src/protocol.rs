//! Wire message shapes, tagged by a `t` field, and their JSON round-trip.
//! Unlike the kernel, decoding here genuinely can fail — on a malformed
//! frame, an unknown `t`, or a non-finite numeric field — so it returns a
//! typed `Result` instead of silently substituting a default.

use serde::{Deserialize, Serialize};

use crate::kernel::{InputCommand, Pallet, Ship, Sun, Vec2, World};

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("unrecognized message type {0:?}")]
    UnknownType(String),
    #[error("non-finite numeric field")]
    NonFinite,
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputMessage {
    pub seq: u32,
    pub thrust: f32,
    pub turn: f32,
}

impl InputMessage {
    pub fn into_command(self) -> InputCommand {
        InputCommand::new(self.thrust, self.turn)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestartMessage;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2Wire {
    pub x: f64,
    pub y: f64,
}

impl From<Vec2> for Vec2Wire {
    fn from(v: Vec2) -> Self {
        Vec2Wire { x: v.x, y: v.y }
    }
}

impl From<Vec2Wire> for Vec2 {
    fn from(v: Vec2Wire) -> Self {
        Vec2::new(v.x, v.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipWire {
    pub pos: Vec2Wire,
    pub vel: Vec2Wire,
    pub rot: f64,
    pub energy: f32,
}

impl From<Ship> for ShipWire {
    fn from(s: Ship) -> Self {
        ShipWire {
            pos: s.pos.into(),
            vel: s.vel.into(),
            rot: s.rot,
            energy: s.energy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunWire {
    pub pos: Vec2Wire,
    pub radius: f32,
}

impl From<Sun> for SunWire {
    fn from(s: Sun) -> Self {
        SunWire {
            pos: s.pos.into(),
            radius: s.radius,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PalletWire {
    pub id: u32,
    pub pos: Vec2Wire,
    pub active: bool,
}

impl From<Pallet> for PalletWire {
    fn from(p: Pallet) -> Self {
        PalletWire {
            id: p.id,
            pos: p.pos.into(),
            active: p.active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMessage {
    pub tick: u32,
    pub ship: ShipWire,
    pub sun: SunWire,
    pub pallets: Vec<PalletWire>,
    pub done: bool,
    pub win: bool,
    #[serde(rename = "ackSeq", skip_serializing_if = "Option::is_none", default)]
    pub ack_seq: Option<u32>,
}

impl SnapshotMessage {
    pub fn from_world(world: &World, ack_seq: Option<u32>) -> Self {
        SnapshotMessage {
            tick: world.tick,
            ship: world.ship.into(),
            sun: world.sun.into(),
            pallets: world.pallets.iter().copied().map(Into::into).collect(),
            done: world.done,
            win: world.win,
            ack_seq,
        }
    }
}

/// All three inbound/outbound shapes under one tagged envelope, `t` as the
/// tag. Inbound frames decode to `Input`/`Restart`; outbound frames encode as
/// `Snapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum Message {
    #[serde(rename = "input")]
    Input(InputMessage),
    #[serde(rename = "restart")]
    Restart(RestartMessage),
    #[serde(rename = "snapshot")]
    Snapshot(SnapshotMessage),
}

fn all_finite(message: &Message) -> bool {
    match message {
        Message::Input(m) => m.thrust.is_finite() && m.turn.is_finite(),
        Message::Restart(_) => true,
        Message::Snapshot(s) => {
            s.ship.pos.x.is_finite()
                && s.ship.pos.y.is_finite()
                && s.ship.vel.x.is_finite()
                && s.ship.vel.y.is_finite()
                && s.ship.rot.is_finite()
                && s.ship.energy.is_finite()
                && s.sun.pos.x.is_finite()
                && s.sun.pos.y.is_finite()
                && s.sun.radius.is_finite()
                && s.pallets
                    .iter()
                    .all(|p| p.pos.x.is_finite() && p.pos.y.is_finite())
        }
    }
}

/// Decodes one JSON text frame. Rejects unknown `t`, non-finite numeric
/// fields, and malformed JSON — never panics on adversarial input.
pub fn decode(frame: &str) -> Result<Message, ProtocolError> {
    let value: serde_json::Value = serde_json::from_str(frame)?;
    match value.get("t").and_then(|t| t.as_str()) {
        Some("input") | Some("restart") | Some("snapshot") => {}
        Some(other) => return Err(ProtocolError::UnknownType(other.to_string())),
        None => return Err(ProtocolError::UnknownType(String::new())),
    }
    let message: Message = serde_json::from_value(value)?;
    if !all_finite(&message) {
        return Err(ProtocolError::NonFinite);
    }
    Ok(message)
}

pub fn encode(message: &Message) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(message)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::{Ship, Sun};

    #[test]
    fn round_trips_input_message() {
        let message = Message::Input(InputMessage {
            seq: 7,
            thrust: 0.5,
            turn: -0.2,
        });
        let encoded = encode(&message).unwrap();
        let decoded = decode(&encoded).unwrap();
        match decoded {
            Message::Input(m) => {
                assert_eq!(m.seq, 7);
                assert_eq!(m.thrust, 0.5);
                assert_eq!(m.turn, -0.2);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn round_trips_restart_message() {
        let encoded = encode(&Message::Restart(RestartMessage)).unwrap();
        assert!(matches!(decode(&encoded).unwrap(), Message::Restart(_)));
    }

    #[test]
    fn round_trips_snapshot_message() {
        let world = World::new(
            Ship::new(Vec2::new(1.0, 2.0), Vec2::ZERO, 0.0, 100.0),
            Sun {
                pos: Vec2::ZERO,
                radius: 50.0,
                mass: 1000.0,
            },
            vec![Pallet {
                id: 1,
                pos: Vec2::new(0.5, 0.0),
                active: true,
            }],
        );
        let message = Message::Snapshot(SnapshotMessage::from_world(&world, Some(5)));
        let encoded = encode(&message).unwrap();
        let decoded = decode(&encoded).unwrap();
        match decoded {
            Message::Snapshot(s) => {
                assert_eq!(s.tick, 0);
                assert_eq!(s.ack_seq, Some(5));
                assert_eq!(s.pallets.len(), 1);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn rejects_unknown_type() {
        let err = decode(r#"{"t":"teleport"}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::UnknownType(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = decode("not json").unwrap_err();
        assert!(matches!(err, ProtocolError::Json(_)));
    }

    #[test]
    fn rejects_missing_required_field() {
        let err = decode(r#"{"t":"input","seq":1,"thrust":0.5}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::Json(_)));
    }

    #[test]
    fn rejects_non_finite_field() {
        // serde_json cannot itself represent NaN/Infinity in text, so a
        // non-finite value only ever arrives via a value we construct
        // in-process and re-encode with a permissive writer; this test
        // exercises the finiteness gate directly.
        let message = Message::Input(InputMessage {
            seq: 1,
            thrust: f32::NAN,
            turn: 0.0,
        });
        assert!(!all_finite(&message));
    }

    #[test]
    fn ack_seq_is_omitted_when_absent() {
        let world = World::new(
            Ship::new(Vec2::ZERO, Vec2::ZERO, 0.0, 100.0),
            Sun {
                pos: Vec2::ZERO,
                radius: 50.0,
                mass: 1000.0,
            },
            vec![],
        );
        let encoded = encode(&Message::Snapshot(SnapshotMessage::from_world(&world, None))).unwrap();
        assert!(!encoded.contains("ackSeq") && !encoded.contains("ack_seq"));
    }
}
