use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

pub trait SenderExt<T> {
    fn send_safe(&self, message: T);
}

impl<T> SenderExt<T> for UnboundedSender<T> {
    fn send_safe(&self, message: T) {
        if self.send(message).is_err() {
            debug!("Receiver is gone, dropping message");
        }
    }
}
