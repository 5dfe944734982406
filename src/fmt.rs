//! 日志宏，根据启用的 feature 转发到 `defmt` 或 `log`，都未启用时编译为空。
#![allow(unused_macros)]

#[cfg(all(feature = "log", feature = "defmt", not(doc)))]
compile_error!("features `log` and `defmt` are mutually exclusive");

#[cfg(all(not(doc), feature = "defmt"))]
#[macro_use]
mod inner {
    macro_rules! trace {
        ($s:literal $(, $x:expr)* $(,)?) => {
            {
                ::defmt::trace!($s $(, $x)*);
            }
        };
    }

    macro_rules! debug {
        ($s:literal $(, $x:expr)* $(,)?) => {
            {
                ::defmt::debug!($s $(, $x)*);
            }
        };
    }

    macro_rules! warn {
        ($s:literal $(, $x:expr)* $(,)?) => {
            {
                ::defmt::warn!($s $(, $x)*);
            }
        };
    }
}

#[cfg(all(not(doc), feature = "log"))]
#[macro_use]
mod inner {
    macro_rules! trace {
        ($s:literal $(, $x:expr)* $(,)?) => {
            {
                ::log::trace!($s $(, $x)*);
            }
        };
    }

    macro_rules! debug {
        ($s:literal $(, $x:expr)* $(,)?) => {
            {
                ::log::debug!($s $(, $x)*);
            }
        };
    }

    macro_rules! warn {
        ($s:literal $(, $x:expr)* $(,)?) => {
            {
                ::log::warn!($s $(, $x)*);
            }
        };
    }
}

// 供 `cargo doc` 使用
#[cfg(any(doc, not(any(feature = "defmt", feature = "log"))))]
#[macro_use]
mod inner {
    macro_rules! trace {
        ($s:literal $(, $x:expr)* $(,)?) => {
            {
                let _ = ($( & $x ),*);
            }
        };
    }

    macro_rules! debug {
        ($s:literal $(, $x:expr)* $(,)?) => {
            {
                let _ = ($( & $x ),*);
            }
        };
    }

    macro_rules! warn {
        ($s:literal $(, $x:expr)* $(,)?) => {
            {
                let _ = ($( & $x ),*);
            }
        };
    }
}
