// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

macro_rules! vpp_log {
    ($log:expr, $level:ident, $msg:expr, $($args:expr),*; $($key:expr => $value:expr),*) => {
        slog::$level!($log,
            $msg, $($args),*;
            "component" => crate::COMPONENT_VPP_LOWER,
            "module" => crate::MOD_SYNC,
            "unit" => crate::UNIT_VPP,
            $($key => $value),*
        )
    };
    ($log:expr, $level:ident, $msg:expr; $($key:expr => $value:expr),*) => {
        slog::$level!($log,
            $msg;
            "component" => crate::COMPONENT_VPP_LOWER,
            "module" => crate::MOD_SYNC,
            "unit" => crate::UNIT_VPP,
            $($key => $value),*
        )
    };
    ($log:expr, $level:ident, $msg:expr) => {
        slog::$level!($log,
            $msg;
            "component" => crate::COMPONENT_VPP_LOWER,
            "module" => crate::MOD_SYNC,
            "unit" => crate::UNIT_VPP
        )
    };
}

pub(crate) use vpp_log;
