// In-process result bus between the simulation runner and the surrounding
// service.

use tokio::sync::mpsc;

use crate::message::MatchResultMessage;

pub type ResultSender = mpsc::UnboundedSender<MatchResultMessage>;
pub type ResultReceiver = mpsc::UnboundedReceiver<MatchResultMessage>;

/// Creates the channel the simulation runner publishes results on.
pub fn result_channel() -> (ResultSender, ResultReceiver) {
    mpsc::unbounded_channel()
}
