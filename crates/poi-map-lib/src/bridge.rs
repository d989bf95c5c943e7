//! Click bridge between the map surface and the native form
//!
//! The map surface owns a [`BridgeEndpoint`] and reports clicks through it; the
//! native side owns the [`ClickBridge`] and delivers pending clicks into a
//! [`CoordinateSink`] once per frame. Messages only flow surface -> form.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, error::TryRecvError, unbounded_channel};

/// Receiver of clicked coordinates (the form's latitude/longitude fields)
pub trait CoordinateSink {
    fn receive(&mut self, lat: f64, lon: f64);
}

/// Surface-side handle used to report a map click
#[derive(Debug, Clone)]
pub struct BridgeEndpoint {
    sender: UnboundedSender<(f64, f64)>,
}

impl BridgeEndpoint {
    /// Fire-and-forget: a click reported after the native side has gone away is dropped
    pub fn send_coordinates(&self, lat: f64, lon: f64) {
        tracing::trace!("Map clicked at ({lat}, {lon})");
        if self.sender.send((lat, lon)).is_err() {
            tracing::debug!("Click bridge closed, dropping click at ({lat}, {lon})");
        }
    }
}

/// Native side of the click bridge
#[derive(Debug)]
pub struct ClickBridge {
    sender: UnboundedSender<(f64, f64)>,
    receiver: UnboundedReceiver<(f64, f64)>,
}

impl ClickBridge {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded_channel();
        Self { sender, receiver }
    }

    /// A new endpoint for the map surface
    pub fn endpoint(&self) -> BridgeEndpoint {
        BridgeEndpoint {
            sender: self.sender.clone(),
        }
    }

    /// Deliver every pending click to `sink` in arrival order.
    ///
    /// Returns the number of clicks delivered.
    pub fn deliver(&mut self, sink: &mut impl CoordinateSink) -> usize {
        let mut delivered = 0;
        loop {
            match self.receiver.try_recv() {
                Ok((lat, lon)) => {
                    sink.receive(lat, lon);
                    delivered += 1;
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        delivered
    }
}

impl Default for ClickBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink(Vec<(f64, f64)>);

    impl CoordinateSink for RecordingSink {
        fn receive(&mut self, lat: f64, lon: f64) {
            self.0.push((lat, lon));
        }
    }

    #[test]
    fn test_deliver_in_arrival_order() {
        let mut bridge = ClickBridge::new();
        let endpoint = bridge.endpoint();
        endpoint.send_coordinates(1.0, 2.0);
        endpoint.clone().send_coordinates(3.0, 4.0);

        let mut sink = RecordingSink::default();
        assert_eq!(bridge.deliver(&mut sink), 2);
        assert_eq!(sink.0, [(1.0, 2.0), (3.0, 4.0)]);

        // Nothing left to deliver
        assert_eq!(bridge.deliver(&mut sink), 0);
        assert_eq!(sink.0.len(), 2);
    }

    #[test]
    fn test_send_after_bridge_dropped_is_ignored() {
        let bridge = ClickBridge::new();
        let endpoint = bridge.endpoint();
        drop(bridge);
        endpoint.send_coordinates(1.0, 2.0);
    }
}
