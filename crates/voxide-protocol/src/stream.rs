use crate::packet::Packet;

/// Lazily walks a packet tree depth-first, left-to-right, yielding leaf
/// packets only. A receiver draining this iterator sees the same sequence it
/// would have seen had each leaf arrived as its own frame.
pub fn flatten_packets(root: &Packet) -> PacketStream<'_> {
    PacketStream { stack: vec![root] }
}

/// Iterator behind [`flatten_packets`]. Keeps an explicit work stack, so
/// iteration itself never recurses.
pub struct PacketStream<'a> {
    stack: Vec<&'a Packet>,
}

impl<'a> Iterator for PacketStream<'a> {
    type Item = &'a Packet;

    fn next(&mut self) -> Option<&'a Packet> {
        while let Some(packet) = self.stack.pop() {
            match packet {
                Packet::Batch(children) => self.stack.extend(children.iter().rev()),
                leaf => return Some(leaf),
            }
        }
        None
    }
}
