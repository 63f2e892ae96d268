//! Order price computation.
//!
//! An order carries three amounts: the value of the goods (`product_price`),
//! the delivery fee (`shipping_cost`) and the total `price`. When either of the
//! first two is known the total is derived from them; otherwise the explicit
//! `price` is authoritative.

use crate::{EngineError, MoneyCents, ResultEngine};

/// Resolved amounts for an order, all in minor units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Quote {
    pub product_price_minor: i64,
    pub shipping_cost_minor: i64,
    pub price_minor: i64,
}

/// Computes the price of an order.
///
/// - If `product_price` or `shipping_cost` is present, the price is their sum,
///   an absent component counting as 0.
/// - Otherwise `explicit_price` is used as given; it is required in that case.
pub fn quote(
    product_price_minor: Option<i64>,
    shipping_cost_minor: Option<i64>,
    explicit_price_minor: Option<i64>,
) -> ResultEngine<Quote> {
    if product_price_minor.is_none() && shipping_cost_minor.is_none() {
        let price = explicit_price_minor.ok_or_else(|| {
            EngineError::InvalidArgument(
                "price is required when product_price and shipping_cost are missing".to_string(),
            )
        })?;
        let price = MoneyCents::non_negative(price, "price")?;
        return Ok(Quote {
            product_price_minor: 0,
            shipping_cost_minor: 0,
            price_minor: price.cents(),
        });
    }

    let product = MoneyCents::non_negative(product_price_minor.unwrap_or(0), "product_price")?;
    let shipping = MoneyCents::non_negative(shipping_cost_minor.unwrap_or(0), "shipping_cost")?;
    let price = product.plus(shipping)?;

    Ok(Quote {
        product_price_minor: product.cents(),
        shipping_cost_minor: shipping.cents(),
        price_minor: price.cents(),
    })
}
