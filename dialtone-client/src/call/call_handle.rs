use crate::call::CallCommand;
use dialtone_core::PeerId;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendError;

/// UI side of a running `CallMachine`. The machine stops once every handle is
/// dropped.
#[derive(Clone)]
pub struct CallHandle {
    tx: mpsc::Sender<CallCommand>,
}

impl CallHandle {
    pub(crate) fn new(tx: mpsc::Sender<CallCommand>) -> Self {
        Self { tx }
    }

    pub async fn start_call(&self, to: PeerId) -> Result<(), SendError<CallCommand>> {
        self.tx.send(CallCommand::StartCall { to }).await
    }

    pub async fn accept(&self) -> Result<(), SendError<CallCommand>> {
        self.tx.send(CallCommand::Accept).await
    }

    pub async fn reject(&self) -> Result<(), SendError<CallCommand>> {
        self.tx.send(CallCommand::Reject).await
    }

    pub async fn hangup(&self) -> Result<(), SendError<CallCommand>> {
        self.tx.send(CallCommand::Hangup).await
    }
}
