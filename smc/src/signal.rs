use crate::candle::{Candle, PriceZone};
use crate::constant::{EntryTag, StructureSignal, Sweep, ZoneSide};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalFlags {
    pub enter_long: bool,
    pub enter_short: bool,
    pub exit_long: bool,
    pub exit_short: bool,
    pub entry_tag: Option<EntryTag>,
}

/// Per-bar inputs the synthesizer needs from the earlier passes.
#[derive(Debug, Clone, Copy)]
pub struct BarContext<'a> {
    pub candle: &'a Candle,
    pub structure: StructureSignal,
    pub sweep: Sweep,
    pub order_block: Option<PriceZone>,
    pub fvg: Option<PriceZone>,
}

impl BarContext<'_> {
    fn touches(&self, side: ZoneSide) -> bool {
        let hit = |zone: Option<PriceZone>| {
            zone.is_some_and(|z| z.side == side && z.touched_by(self.candle))
        };
        hit(self.order_block) || hit(self.fvg)
    }
}

/// Entry requires a BOS, a sweep and a touched zone, all on the same side.
/// A CHoCH against a position exits it.
pub fn synthesize(ctx: &BarContext<'_>) -> SignalFlags {
    let enter_long = ctx.structure == StructureSignal::BosUp
        && ctx.sweep == Sweep::SweptUp
        && ctx.touches(ZoneSide::Bullish);
    let enter_short = ctx.structure == StructureSignal::BosDown
        && ctx.sweep == Sweep::SweptDown
        && ctx.touches(ZoneSide::Bearish);

    let entry_tag = if enter_short {
        Some(EntryTag::ShortSmcSimple)
    } else if enter_long {
        Some(EntryTag::LongSmcSimple)
    } else {
        None
    };

    SignalFlags {
        enter_long,
        enter_short,
        exit_long: ctx.structure == StructureSignal::ChochDown,
        exit_short: ctx.structure == StructureSignal::ChochUp,
        entry_tag,
    }
}
