use std::io::ErrorKind;

use tungstenite::protocol::Message;

use crate::reload::message::ReloadMessage;

use super::WsActor;

impl WsActor {
    /// Broadcast a message to all connected clients
    pub(super) fn broadcast(&self, message: &ReloadMessage) {
        let mut clients = self.clients.lock();
        let count = clients.len();

        if count == 0 {
            crate::debug!("ws"; "no clients connected");
            return;
        }

        let frame = Message::Text(message.to_json().into());
        clients.retain_mut(|ws| match ws.send(frame.clone()) {
            Ok(_) => true,
            // Queued in the write buffer; the reader thread flushes it
            Err(tungstenite::Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => true,
            Err(e) => {
                crate::debug!("ws"; "client disconnected: {}", e);
                false
            }
        });
        self.count.set(clients.len());
        crate::debug!("ws"; "broadcast {} to {} clients", message.kind(), count);
    }
}
