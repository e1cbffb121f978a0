use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// The `type` of a session description, as the media transport reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdpKind {
    Offer,
    Answer,
    Pranswer,
    Rollback,
}

impl SdpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SdpKind::Offer => "offer",
            SdpKind::Answer => "answer",
            SdpKind::Pranswer => "pranswer",
            SdpKind::Rollback => "rollback",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "offer" => Some(SdpKind::Offer),
            "answer" => Some(SdpKind::Answer),
            "pranswer" => Some(SdpKind::Pranswer),
            "rollback" => Some(SdpKind::Rollback),
            _ => None,
        }
    }
}

/// Negotiation payload produced and consumed by the media transport.
///
/// Signaling relays it as whatever JSON the sender put on the wire; only the
/// transport looks inside, through `kind` and `sdp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionDescription(Value);

impl SessionDescription {
    pub fn new(kind: SdpKind, sdp: impl Into<String>) -> Self {
        Self(json!({ "type": kind.as_str(), "sdp": sdp.into() }))
    }

    pub fn offer(sdp: impl Into<String>) -> Self {
        Self::new(SdpKind::Offer, sdp)
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self::new(SdpKind::Answer, sdp)
    }

    /// `None` when `type` is missing or not one the transport knows.
    pub fn kind(&self) -> Option<SdpKind> {
        self.0.get("type").and_then(Value::as_str).and_then(SdpKind::parse)
    }

    pub fn sdp(&self) -> Option<&str> {
        self.0.get("sdp").and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for SessionDescription {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// One network path a peer could be reached on, carried in the browser's
/// `RTCIceCandidateInit` JSON shape. Relayed as-is, like `SessionDescription`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IceCandidateDescription(Value);

impl IceCandidateDescription {
    pub fn new(candidate: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("candidate".to_owned(), Value::String(candidate.into()));
        Self(Value::Object(fields))
    }

    pub fn with_sdp_mid(self, sdp_mid: impl Into<String>) -> Self {
        self.with_field("sdpMid", Value::String(sdp_mid.into()))
    }

    pub fn with_sdp_m_line_index(self, index: u16) -> Self {
        self.with_field("sdpMLineIndex", Value::from(index))
    }

    pub fn with_username_fragment(self, ufrag: impl Into<String>) -> Self {
        self.with_field("usernameFragment", Value::String(ufrag.into()))
    }

    fn with_field(mut self, key: &str, value: Value) -> Self {
        if let Value::Object(fields) = &mut self.0 {
            fields.insert(key.to_owned(), value);
        }
        self
    }

    pub fn candidate(&self) -> Option<&str> {
        self.0.get("candidate").and_then(Value::as_str)
    }

    pub fn sdp_mid(&self) -> Option<&str> {
        self.0.get("sdpMid").and_then(Value::as_str)
    }

    pub fn sdp_m_line_index(&self) -> Option<u16> {
        self.0
            .get("sdpMLineIndex")
            .and_then(Value::as_u64)
            .and_then(|i| u16::try_from(i).ok())
    }

    pub fn username_fragment(&self) -> Option<&str> {
        self.0.get("usernameFragment").and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for IceCandidateDescription {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
