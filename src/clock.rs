use embassy_time::Instant;

use crate::Clock;

/// 使用 `embassy-time` 全局时间驱动的时钟。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now(&mut self) -> Instant {
        Instant::now()
    }
}
