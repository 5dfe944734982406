#![no_std]

#[macro_use]
mod fmt;

pub mod channel;
pub mod clock;
pub mod config;
pub mod gpio;

pub use config::*;
use core::convert::Infallible;
use embassy_time::{Duration, Instant};
use embedded_hal_async::delay::DelayNs;

use crate::gpio::{ActiveLevel, Level};

/// 读取按钮引脚当前的原始电平。
pub trait PinReader {
    type Error;

    fn read_level(&mut self) -> Result<Level, Self::Error>;
}

impl<F: FnMut() -> Level> PinReader for F {
    type Error = Infallible;

    fn read_level(&mut self) -> Result<Level, Self::Error> {
        Ok(self())
    }
}

/// 毫秒级时间源，要求单调不减。
pub trait Clock {
    fn now(&mut self) -> Instant;
}

impl<F: FnMut() -> Instant> Clock for F {
    fn now(&mut self) -> Instant {
        self()
    }
}

/// 接收分类后的按钮事件。
///
/// 在 `Button::step` 内被同步调用，每次调用最多一次。
pub trait EventSink {
    fn on_event(&mut self, event: ButtonEvent);
}

impl<F: FnMut(ButtonEvent)> EventSink for F {
    fn on_event(&mut self, event: ButtonEvent) {
        self(event)
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// 一次或连续多次点击，`count` 为窗口内累计的按下次数。
    MultiClick { count: u8 },
    /// 短按：按住时长达到短按阈值。
    Press,
    /// 长按：按住时长达到长按阈值。
    LongPress,
}

impl ButtonEvent {
    /// 事件对应的使能位
    pub fn kind(&self) -> EventMask {
        match self {
            ButtonEvent::MultiClick { .. } => EventMask::MULTI_CLICK,
            ButtonEvent::Press => EventMask::PRESS,
            ButtonEvent::LongPress => EventMask::LONG_PRESS,
        }
    }
}

const ZERO: Duration = Duration::from_ticks(0);

/// 轮询式按钮状态机。
///
/// 调用方在自己的循环里周期性地调用 [`Button::step`]（建议 1~10ms 一次），
/// 每次调用读取一次引脚和时钟，完成消抖并对交互进行分类。
/// 每个实例相互独立，不持有任何全局状态。
pub struct Button<P: PinReader, C: Clock, S: EventSink> {
    pin: P,
    clock: C,
    sink: S,
    config: ButtonConfig,
    active_level: ActiveLevel,
    /// 上一次采样到的原始电平
    last_level: Level,
    /// 经过消抖确认的电平
    debounced_level: Level,
    /// 最近一次原始电平变化的时间
    last_edge: Instant,
    /// 最近一次按下的持续时间，在释放的那一刻记录
    press_duration: Duration,
    /// 未结算的按下次数，非零表示有交互正在进行
    click_count: u8,
}

impl<P: PinReader, C: Clock, S: EventSink> Button<P, C, S> {
    /// 使用默认配置创建按钮。默认配置下所有事件都是关闭的。
    pub fn new(active_level: ActiveLevel, pin: P, clock: C, sink: S) -> Self {
        Self::with_config(active_level, pin, clock, sink, ButtonConfig::default())
    }

    /// 使用指定配置创建按钮。
    ///
    /// 内部状态被初始化为“释放”，与引脚的真实电平无关，
    /// 直到后续的 `step` 读到实际电平为止。
    pub fn with_config(
        active_level: ActiveLevel,
        pin: P,
        clock: C,
        sink: S,
        config: ButtonConfig,
    ) -> Self {
        let released = active_level.released();
        Self {
            pin,
            clock,
            sink,
            config,
            active_level,
            last_level: released,
            debounced_level: released,
            last_edge: Instant::from_ticks(0),
            press_duration: ZERO,
            click_count: 0,
        }
    }

    /// 推进一次状态机。
    ///
    /// 若本次调用结算出一个已使能的事件，先投递给事件接收器，再返回该事件。
    /// 读取引脚失败时本次调用不修改任何状态。
    pub fn step(&mut self) -> Option<ButtonEvent> {
        let level = match self.pin.read_level() {
            Ok(level) => level,
            Err(_) => {
                warn!("button pin read failed, skipping step");
                return None;
            }
        };
        let now = self.clock.now();
        let pressed_level = self.active_level.pressed();

        // 边沿检测：任何原始电平变化都会重新开始计时
        if level != self.last_level {
            self.press_duration = if level == pressed_level {
                ZERO
            } else {
                now.saturating_duration_since(self.last_edge)
            };
            self.last_edge = now;
            self.last_level = level;
        }

        let elapsed = now.saturating_duration_since(self.last_edge);

        if self.debounced_level != level && elapsed >= self.config.debounce {
            if level == pressed_level {
                self.click_count = self.click_count.saturating_add(1);
            }
            self.debounced_level = level;
            trace!(
                "button level confirmed: {:?}, clicks {}",
                level,
                self.click_count
            );
        }

        if self.click_count == 0 {
            return None;
        }

        let event = self.classify(level == pressed_level, elapsed)?;
        self.click_count = 0;

        if !self.config.events.contains(event.kind()) {
            trace!("button event {:?} resolved but disabled", event);
            return None;
        }

        debug!("button event {:?}", event);
        self.sink.on_event(event);
        Some(event)
    }

    /// 判断当前交互是否可以结算。
    ///
    /// 返回 `Some` 表示交互结束，无论该事件是否被使能。
    fn classify(&self, pressed: bool, elapsed: Duration) -> Option<ButtonEvent> {
        let config = &self.config;

        if pressed {
            // 仍处于按下状态：使能了长按时只等长按，短按留到释放时结算
            if config.events.contains(EventMask::LONG_PRESS) {
                (elapsed >= config.long_press_time).then_some(ButtonEvent::LongPress)
            } else if config.events.contains(EventMask::PRESS) {
                (elapsed >= config.press_time).then_some(ButtonEvent::Press)
            } else {
                None
            }
        } else if self.press_duration >= config.long_press_time {
            Some(ButtonEvent::LongPress)
        } else if self.press_duration >= config.press_time {
            Some(ButtonEvent::Press)
        } else if elapsed >= config.multi_click_window {
            Some(ButtonEvent::MultiClick {
                count: self.click_count,
            })
        } else {
            None
        }
    }

    /// 在 embassy 任务中以固定间隔持续轮询按钮。
    ///
    /// 事件通过构造时传入的 `EventSink` 投递，例如 [`channel::ChannelSink`]。
    pub async fn run<D: DelayNs>(&mut self, delay: &mut D, interval_ms: u32) -> ! {
        loop {
            self.step();
            delay.delay_ms(interval_ms).await;
        }
    }

    pub fn set_config(&mut self, new_config: ButtonConfig) {
        self.config = new_config;
    }

    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.config.debounce = debounce;
    }

    pub fn set_multi_click_window(&mut self, window: Duration) {
        self.config.multi_click_window = window;
    }

    pub fn set_press_time(&mut self, press_time: Duration) {
        self.config.press_time = press_time;
    }

    pub fn set_long_press_time(&mut self, long_press_time: Duration) {
        self.config.long_press_time = long_press_time;
    }

    /// 使能给定的事件，其余事件保持不变。
    pub fn enable_events(&mut self, events: EventMask) {
        self.config.events.insert(events);
    }

    /// 关闭给定的事件，其余事件保持不变。
    pub fn disable_events(&mut self, events: EventMask) {
        self.config.events.remove(events);
    }

    pub fn events(&self) -> EventMask {
        self.config.events
    }

    pub fn active_level(&self) -> ActiveLevel {
        self.active_level
    }

    /// 尚未结算的按下次数。
    pub fn click_count(&self) -> u8 {
        self.click_count
    }

    /// 消抖后的按钮是否处于按下状态
    pub fn is_pressed(&self) -> bool {
        self.debounced_level == self.active_level.pressed()
    }

    pub fn set_pin(&mut self, pin: P) {
        self.pin = pin;
    }

    pub fn set_clock(&mut self, clock: C) {
        self.clock = clock;
    }

    pub fn set_sink(&mut self, sink: S) {
        self.sink = sink;
    }

    /// 获取引脚读取器的不可变引用
    pub fn pin(&self) -> &P {
        &self.pin
    }

    /// 获取引脚读取器的可变引用
    pub fn pin_mut(&mut self) -> &mut P {
        &mut self.pin
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// 放弃当前未结算的交互。
    pub fn reset(&mut self) {
        self.click_count = 0;
        self.press_duration = ZERO;
    }

    /// 拆解按钮，取回引脚、时钟和事件接收器。
    pub fn into_parts(self) -> (P, C, S) {
        (self.pin, self.clock, self.sink)
    }

    /// 从调用方的槽位中取出并销毁按钮，槽位随后为 `None`。
    pub fn destroy(slot: &mut Option<Self>) -> Option<(P, C, S)> {
        slot.take().map(Self::into_parts)
    }
}
