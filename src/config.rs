use bitflags::bitflags;
use embassy_time::Duration;

/// 按钮事件的使能位集合。
///
/// 只有被使能的事件才会被投递给事件接收器。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventMask(u8);

bitflags! {
    impl EventMask: u8 {
        /// 多击事件
        const MULTI_CLICK = 1 << 0;
        /// 短按事件
        const PRESS = 1 << 1;
        /// 长按事件
        const LONG_PRESS = 1 << 2;
        /// 全部事件
        const ALL = Self::MULTI_CLICK.bits() | Self::PRESS.bits() | Self::LONG_PRESS.bits();
    }
}

/// 定义按钮事件逻辑的通用配置参数。
///
/// 所有字段都可以在运行过程中修改，下一次 `step` 调用即读取新值。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    /// 消抖持续时间。
    ///
    /// 电平变化后需要保持这么久才会被确认，
    /// 以防止物理按键的机械抖动产生误报。
    pub debounce: Duration,

    /// 多击的时间窗口。
    ///
    /// 释放后在此窗口内没有新的按下，才会结算为一次 `MultiClick` 事件。
    pub multi_click_window: Duration,

    /// 触发短按事件所需的持续时间。
    pub press_time: Duration,

    /// 触发长按事件所需的持续时间。
    pub long_press_time: Duration,

    /// 已使能的事件。
    pub events: EventMask,
}

impl Default for ButtonConfig {
    /// 提供一套默认配置。
    ///
    /// - 消抖: 20ms
    /// - 多击窗口: 200ms
    /// - 短按阈值: 500ms
    /// - 长按阈值: 2000ms
    /// - 事件: 全部关闭，需要调用方显式使能
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(20),
            multi_click_window: Duration::from_millis(200),
            press_time: Duration::from_millis(500),
            long_press_time: Duration::from_millis(2000),
            events: EventMask::empty(),
        }
    }
}

impl ButtonConfig {
    /// 以默认时间参数创建配置，并使能给定的事件。
    pub fn with_events(events: EventMask) -> Self {
        Self {
            events,
            ..Self::default()
        }
    }
}
