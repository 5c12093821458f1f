//! Kitchen order priority
//!
//! Pure function of order metadata, reproduced exactly for testability.

use shared::{OrderType, SourceOrder};

const MINUTE_MS: i64 = 60_000;

/// Compute the initial priority of a kitchen order, clamped to [0, 10]
///
/// Base 5; +3/+2/+1 for wait time over 30/15/5 minutes since order
/// creation; +2 for dine-in, +1 for delivery.
pub fn calculate_order_priority(order: &SourceOrder, now_ms: i64) -> u8 {
    let mut priority: i64 = 5;

    let waited_ms = now_ms - order.created_at;
    if waited_ms > 30 * MINUTE_MS {
        priority += 3;
    } else if waited_ms > 15 * MINUTE_MS {
        priority += 2;
    } else if waited_ms > 5 * MINUTE_MS {
        priority += 1;
    }

    match order.order_type {
        OrderType::DineIn => priority += 2,
        OrderType::Delivery => priority += 1,
        OrderType::Takeaway => {}
    }

    priority.clamp(0, 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(order_type: OrderType, created_at: i64) -> SourceOrder {
        SourceOrder {
            id: "ord-1".to_string(),
            branch_id: 1,
            order_type,
            created_at,
            lines: Vec::new(),
        }
    }

    #[test]
    fn test_fresh_takeaway_is_base_priority() {
        let now = 10 * MINUTE_MS;
        let o = order(OrderType::Takeaway, now - 4 * MINUTE_MS);
        assert_eq!(calculate_order_priority(&o, now), 5);
    }

    #[test]
    fn test_stale_dine_in_caps_at_ten() {
        let now = 100 * MINUTE_MS;
        let o = order(OrderType::DineIn, now - 31 * MINUTE_MS);
        // 5 + 3 + 2 = 10
        assert_eq!(calculate_order_priority(&o, now), 10);
    }

    #[test]
    fn test_wait_time_tiers() {
        let now = 100 * MINUTE_MS;
        let tiers = [
            (6 * MINUTE_MS, 6),
            (16 * MINUTE_MS, 7),
            (31 * MINUTE_MS, 8),
        ];
        for (wait, expected) in tiers {
            let o = order(OrderType::Takeaway, now - wait);
            assert_eq!(calculate_order_priority(&o, now), expected);
        }
    }

    #[test]
    fn test_delivery_bump() {
        let now = MINUTE_MS;
        let o = order(OrderType::Delivery, now);
        assert_eq!(calculate_order_priority(&o, now), 6);
    }

    #[test]
    fn test_result_in_range() {
        let now = 1_000 * MINUTE_MS;
        for wait in [0, 10, 20, 40, 500] {
            for order_type in [OrderType::DineIn, OrderType::Takeaway, OrderType::Delivery] {
                let o = order(order_type, now - wait * MINUTE_MS);
                let p = calculate_order_priority(&o, now);
                assert!(p <= 10);
            }
        }
    }
}
