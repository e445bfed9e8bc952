mod queue;
pub(crate) use queue::SlotQueue;
