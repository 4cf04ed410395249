// Swap/bridge quote preview. Pure functions only; no state.

use crate::{
    constants::{
        BASE_FEE_PERCENT, DEFAULT_SLIPPAGE_PERCENT, ESTIMATED_TIME_BRIDGE, ESTIMATED_TIME_SWAP,
        HIGH_PRICE_IMPACT_PERCENT, MAX_SLIPPAGE_PERCENT, POINTS_PER_USD_SWAP,
        QUOTE_DISPLAY_DECIMALS, ROUTE_BRIDGE, ROUTE_SWAP,
    },
    error::{AppError, Result},
    models::{FeeDiscount, Quote, Token},
};

/// Lenient parse used by the calculator: anything unusable becomes 0.
pub fn parse_amount_lenient(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(0.0)
}

/// Strict parse applied at the API boundary before a quote is computed.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidAmount("amount is required".to_string()));
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| AppError::InvalidAmount(format!("'{}' is not a number", trimmed)))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(AppError::InvalidAmount(
            "Amount must be greater than zero".to_string(),
        ));
    }
    Ok(value)
}

pub fn effective_fee_percent(discount: &FeeDiscount) -> f64 {
    if discount_applies(discount) {
        let factor = 1.0 - (discount.discount_percent.clamp(0.0, 100.0) / 100.0);
        BASE_FEE_PERCENT * factor
    } else {
        BASE_FEE_PERCENT
    }
}

fn discount_applies(discount: &FeeDiscount) -> bool {
    discount.active && discount.uses_remaining > 0
}

fn round_display(value: f64) -> f64 {
    let scale = 10f64.powi(QUOTE_DISPLAY_DECIMALS);
    (value * scale).round() / scale
}

/// Cosmetic impact: drift between the displayed (rounded) output and the exact conversion.
fn price_impact_percent(displayed: f64, exact: f64) -> f64 {
    if exact > 0.0 {
        ((displayed - exact) / exact * 100.0).abs()
    } else {
        0.0
    }
}

fn normalize_slippage(slippage: f64) -> f64 {
    if slippage.is_finite() {
        slippage.clamp(0.0, MAX_SLIPPAGE_PERCENT)
    } else {
        DEFAULT_SLIPPAGE_PERCENT
    }
}

pub fn compute_quote(from: &Token, to: &Token, input_amount: &str, discount: &FeeDiscount) -> Quote {
    compute_quote_with_slippage(from, to, input_amount, discount, DEFAULT_SLIPPAGE_PERCENT)
}

pub fn compute_quote_with_slippage(
    from: &Token,
    to: &Token,
    input_amount: &str,
    discount: &FeeDiscount,
    slippage_percent: f64,
) -> Quote {
    let amount_in = parse_amount_lenient(input_amount);
    let input_usd = amount_in * from.price_usd;

    let output_amount = if to.price_usd > 0.0 {
        input_usd / to.price_usd
    } else {
        0.0
    };
    let rate = if to.price_usd > 0.0 {
        from.price_usd / to.price_usd
    } else {
        0.0
    };
    let displayed_output = round_display(output_amount);
    let price_impact = price_impact_percent(displayed_output, output_amount);

    let fee_percent = effective_fee_percent(discount);
    let fee_usd = input_usd * fee_percent / 100.0;
    let points_earned = (input_usd * POINTS_PER_USD_SWAP).floor().max(0.0) as u64;

    let slippage = normalize_slippage(slippage_percent);
    let cross_chain = from.network != to.network;

    Quote {
        from_token: from.symbol.clone(),
        to_token: to.symbol.clone(),
        from_network: from.network.clone(),
        to_network: to.network.clone(),
        input_amount: amount_in,
        output_amount,
        rate,
        input_usd,
        output_usd: output_amount * to.price_usd,
        fee_percent,
        fee_usd,
        fee_discount_applied: discount_applies(discount),
        price_impact_percent: price_impact,
        high_price_impact: price_impact > HIGH_PRICE_IMPACT_PERCENT,
        points_earned,
        slippage_percent: slippage,
        min_received: output_amount * (1.0 - slippage / 100.0),
        cross_chain,
        route: if cross_chain { ROUTE_BRIDGE } else { ROUTE_SWAP }.to_string(),
        estimated_time: if cross_chain {
            ESTIMATED_TIME_BRIDGE
        } else {
            ESTIMATED_TIME_SWAP
        }
        .to_string(),
    }
}
