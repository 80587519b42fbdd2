use order_intake_core::contract::{GeneratedOrder, GeneratorResult};
use rand::Rng;
use serde_json::json;

use crate::logging::log_info;

const COMPONENT: &str = "order_generator";

/// Draws a fair coin and builds the matching result. The invoking event is
/// ignored entirely.
pub fn generate_order_result<R: Rng + ?Sized>(rng: &mut R) -> GeneratorResult {
    let result = order_result_for(rng.gen::<bool>());
    log_info(
        COMPONENT,
        "orders_generated",
        json!({
            "results": result.results,
            "order_count": result.orders.as_ref().map_or(0, Vec::len),
        }),
    );
    result
}

pub fn order_result_for(results: bool) -> GeneratorResult {
    if !results {
        return GeneratorResult {
            results,
            orders: None,
        };
    }

    GeneratorResult {
        results,
        orders: Some(vec![
            GeneratedOrder {
                status: "accepted".to_string(),
                power: 1,
            },
            GeneratedOrder {
                status: "rejected".to_string(),
                power: 2,
            },
        ]),
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    use super::*;

    #[test]
    fn positive_draw_yields_fixed_orders() {
        let value = serde_json::to_value(order_result_for(true)).expect("result should serialize");

        assert_eq!(
            value,
            json!({
                "results": true,
                "orders": [
                    {"status": "accepted", "power": 1},
                    {"status": "rejected", "power": 2}
                ]
            })
        );
    }

    #[test]
    fn negative_draw_has_no_orders_key() {
        let value = serde_json::to_value(order_result_for(false)).expect("result should serialize");
        assert_eq!(value, json!({"results": false}));
    }

    #[test]
    fn both_outcomes_occur_over_many_draws() {
        let mut rng = StdRng::seed_from_u64(7);
        let draws: Vec<GeneratorResult> =
            (0..200).map(|_| generate_order_result(&mut rng)).collect();

        assert!(draws.iter().any(|result| result.results));
        assert!(draws.iter().any(|result| !result.results));
        for result in draws {
            assert_eq!(result.orders.is_some(), result.results);
        }
    }
}
