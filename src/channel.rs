use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    channel::{Channel, Sender, TrySendError},
};

use crate::{ButtonEvent, EventSink};

/// 按钮事件通道。
pub type ButtonEventChannel<M, const N: usize> = Channel<M, ButtonEvent, N>;

/// 把按钮事件转发到 `embassy-sync` 通道的接收器，
/// 让轮询循环和消费事件的任务解耦。
///
/// 通道满时丢弃事件并打印警告，`step` 永远不会因此阻塞。
pub struct ChannelSink<'a, M: RawMutex, const N: usize> {
    sender: Sender<'a, M, ButtonEvent, N>,
    dropped: u32,
}

impl<'a, M: RawMutex, const N: usize> ChannelSink<'a, M, N> {
    pub fn new(channel: &'a ButtonEventChannel<M, N>) -> Self {
        Self {
            sender: channel.sender(),
            dropped: 0,
        }
    }

    /// 因通道已满而被丢弃的事件数。
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<M: RawMutex, const N: usize> EventSink for ChannelSink<'_, M, N> {
    fn on_event(&mut self, event: ButtonEvent) {
        if let Err(TrySendError::Full(event)) = self.sender.try_send(event) {
            self.dropped = self.dropped.saturating_add(1);
            warn!("button event channel full, dropping {:?}", event);
        }
    }
}
