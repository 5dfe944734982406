use core::convert::Infallible;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use embassy_futures::select::{select, Either};
use embassy_poll_button::{
    channel::{ButtonEventChannel, ChannelSink},
    clock::EmbassyClock,
    config::{ButtonConfig, EventMask},
    gpio::{ActiveLevel, GpioPin},
    Button, ButtonEvent, EventSink,
};
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, NoopRawMutex};
use embassy_time::{with_timeout, Delay, Duration, Timer};

// --- Mock Hardware (模拟硬件) ---

struct MockPin {
    high: Arc<AtomicBool>,
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl embedded_hal::digital::InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high.load(Ordering::SeqCst))
    }
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high.load(Ordering::SeqCst))
    }
}

static CHANNEL: ButtonEventChannel<CriticalSectionRawMutex, 4> = ButtonEventChannel::new();

// 按键动作模拟 + 事件验证
async fn scenario(high: &AtomicBool) {
    Timer::after(Duration::from_millis(50)).await;

    // 双击
    for _ in 0..2 {
        high.store(false, Ordering::SeqCst);
        Timer::after(Duration::from_millis(60)).await;
        high.store(true, Ordering::SeqCst);
        Timer::after(Duration::from_millis(80)).await;
    }
    let event = with_timeout(Duration::from_secs(1), CHANNEL.receive())
        .await
        .expect("Test timed out waiting for a double click");
    assert_eq!(event, ButtonEvent::MultiClick { count: 2 });

    // 按住 800ms 后释放：使能长按时短按在释放时结算
    high.store(false, Ordering::SeqCst);
    Timer::after(Duration::from_millis(800)).await;
    high.store(true, Ordering::SeqCst);
    let event = with_timeout(Duration::from_secs(1), CHANNEL.receive())
        .await
        .expect("Test timed out waiting for a press");
    assert_eq!(event, ButtonEvent::Press);

    // 一直按住，长按阈值到达时触发
    high.store(false, Ordering::SeqCst);
    let event = with_timeout(Duration::from_secs(3), CHANNEL.receive())
        .await
        .expect("Test timed out waiting for a long press");
    high.store(true, Ordering::SeqCst);
    assert_eq!(event, ButtonEvent::LongPress);
}

#[tokio::test]
async fn run_polls_gpio_and_feeds_channel() {
    let high = Arc::new(AtomicBool::new(true));
    let pin = GpioPin::new(MockPin { high: high.clone() });
    let mut button = Button::with_config(
        ActiveLevel::Low,
        pin,
        EmbassyClock,
        ChannelSink::new(&CHANNEL),
        ButtonConfig::with_events(EventMask::ALL),
    );
    let mut delay = Delay;

    match select(button.run(&mut delay, 5), scenario(&high)).await {
        Either::First(_) => unreachable!(),
        Either::Second(()) => {}
    }
    assert_eq!(button.sink().dropped(), 0);
}

#[test]
fn channel_sink_drops_when_full() {
    let channel: ButtonEventChannel<NoopRawMutex, 1> = ButtonEventChannel::new();
    let mut sink = ChannelSink::new(&channel);

    sink.on_event(ButtonEvent::Press);
    sink.on_event(ButtonEvent::LongPress);

    assert_eq!(sink.dropped(), 1);
    assert_eq!(channel.try_receive().ok(), Some(ButtonEvent::Press));
    assert!(channel.try_receive().is_err());
}
