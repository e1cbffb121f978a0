/// What happened to a relayed message. A miss is ordinary traffic (the target
/// hung up or never existed) and is never reported back to the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Delivered,
    RoutingMiss,
}

impl RouteOutcome {
    pub fn is_delivered(self) -> bool {
        matches!(self, RouteOutcome::Delivered)
    }
}
