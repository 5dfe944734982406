use crate::PinReader;
use embedded_hal::digital::InputPin;

/// 引脚的逻辑电平。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// 取反后的电平。
    pub fn toggled(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }
}

impl From<bool> for Level {
    fn from(is_high: bool) -> Self {
        if is_high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// 定义按钮的有效电平。
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveLevel {
    /// 低电平有效（例如，使用上拉电阻，按下时引脚接地）。
    Low,
    /// 高电平有效（例如，使用下拉电阻，按下时引脚接VCC）。
    High,
}

impl ActiveLevel {
    /// 按下时的电平。
    pub fn pressed(self) -> Level {
        match self {
            ActiveLevel::Low => Level::Low,
            ActiveLevel::High => Level::High,
        }
    }

    /// 释放时的电平。
    pub fn released(self) -> Level {
        self.pressed().toggled()
    }
}

/// 直接读取GPIO输入引脚的 `PinReader`。
///
/// 只需要同步的 `InputPin`，不依赖中断或边沿等待。
pub struct GpioPin<P: InputPin> {
    pin: P,
}

impl<P: InputPin> GpioPin<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// 取回底层引脚
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: InputPin> PinReader for GpioPin<P> {
    type Error = P::Error;

    fn read_level(&mut self) -> Result<Level, Self::Error> {
        self.pin.is_high().map(Level::from)
    }
}
