mod tooltip;

pub use tooltip::{
    hit_test, place_tooltip, InputKind, PointerSample, Tooltip, TooltipLayer, TooltipUpdate,
    POINTER_HIT_RADIUS, TOOLTIP_HEIGHT, TOOLTIP_OFFSET, TOOLTIP_WIDTH, TOUCH_AUTO_HIDE,
    TOUCH_HIT_RADIUS,
};
