//! Sale price arithmetic.
//!
//! All prices are integer coins and every multiplier is applied with exact
//! integer floor division. This module is the single home for the premium
//! and discount arithmetic; nothing else in the crate re-derives prices.

/// Sale price of a free-standing simple item: a flat 15% liquidation loss,
/// `floor(purchase_price * 0.85)`.
pub fn simple_sale_price(purchase_price: u64) -> u64 {
    purchase_price * 85 / 100
}

/// Price of a freshly assembled composite: a 15% premium over the component
/// total (part prices plus spec price), `floor(component_total * 1.15)`.
pub fn assembly_price(component_total: u64) -> u64 {
    component_total * 115 / 100
}

/// Sale price of a complete composite.
///
/// `purchase_price` already embeds the assembly premium, so the premium is
/// unwound before re-applying it together with the liquidation discount:
/// the spec price is recovered as `purchase_price - floor(parts_total * 1.15)`
/// and the sale price is `floor((parts_total + spec_price) * 1.15 * 0.85)`.
///
/// The recovered spec price absorbs the premium that was applied to the
/// original spec price at build time, so it is not equal to the build-time
/// value. That drift is intentional and preserved for parity with prices the
/// build step has already stored; the spec price is derived here and never
/// stored separately.
pub fn composite_sale_price(purchase_price: u64, parts_total: u64) -> u64 {
    let spec_price = purchase_price.saturating_sub(assembly_price(parts_total));
    let unwound = parts_total + spec_price;
    unwound * 115 * 85 / 10_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_sale_floors_discount() {
        assert_eq!(simple_sale_price(1000), 850);
        assert_eq!(simple_sale_price(999), 849);
        assert_eq!(simple_sale_price(50), 42);
        assert_eq!(simple_sale_price(0), 0);
    }

    #[test]
    fn assembly_floors_premium() {
        assert_eq!(assembly_price(540), 621);
        assert_eq!(assembly_price(450), 517); // 517.5 truncates
        assert_eq!(assembly_price(290), 333); // 333.5 truncates
        assert_eq!(assembly_price(0), 0);
    }

    #[test]
    fn composite_sale_unwinds_premium() {
        // Parts 100+200+150, spec price 90 at build time:
        // build price = floor((450 + 90) * 1.15) = 621.
        // Unwinding recovers spec' = 621 - floor(450 * 1.15) = 104,
        // sale = floor((450 + 104) * 1.15 * 0.85) = floor(541.535) = 541.
        assert_eq!(composite_sale_price(621, 450), 541);

        // Parts 50+40+40, spec price 160: build price = floor(290 * 1.15) = 333.
        // spec' = 333 - floor(130 * 1.15) = 333 - 149 = 184,
        // sale = floor((130 + 184) * 0.9775) = floor(306.935) = 306.
        assert_eq!(composite_sale_price(333, 130), 306);
    }

    #[test]
    fn composite_sale_never_underflows() {
        // A purchase price below the reconstructed premium clamps the
        // recovered spec price at zero instead of wrapping.
        assert_eq!(composite_sale_price(100, 1000), 1000 * 115 * 85 / 10_000);
    }

    #[test]
    fn unwinding_matches_build_for_zero_spec_price() {
        // With no spec price the unwound total is exactly the parts total.
        let parts_total = 400u64;
        let purchase = assembly_price(parts_total);
        assert_eq!(
            composite_sale_price(purchase, parts_total),
            parts_total * 115 * 85 / 10_000
        );
    }
}
