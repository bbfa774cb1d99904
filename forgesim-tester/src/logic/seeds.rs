use anyhow::{Context, Result, bail};

/// Resolve CLI seed tokens into numeric seeds.
///
/// Accepts decimal integers (negative values use their magnitude) and
/// `0x`-prefixed hex. Duplicates are dropped, keeping first occurrence.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        let seed = if let Some(hex) = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
        {
            u64::from_str_radix(&hex.replace('_', ""), 16)
                .with_context(|| format!("invalid hex seed `{token}`"))?
        } else if let Ok(value) = token.parse::<u64>() {
            value
        } else if let Ok(value) = token.parse::<i64>() {
            value.unsigned_abs()
        } else {
            bail!("unrecognized seed `{token}`: expected an integer or 0x-prefixed hex");
        };

        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }

    if seeds.is_empty() {
        bail!("no seeds provided");
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn parses_decimal_hex_and_negative() {
        let seeds = resolve_seed_inputs(&tokens(&["1337", "0xFF", "-4", "0XDEAD_BEEF"])).unwrap();
        assert_eq!(seeds, vec![1337, 255, 4, 0xDEAD_BEEF]);
    }

    #[test]
    fn drops_duplicates_in_order() {
        let seeds = resolve_seed_inputs(&tokens(&["7", "0x7", "3", "7"])).unwrap();
        assert_eq!(seeds, vec![7, 3]);
    }

    #[test]
    fn rejects_garbage_and_empty_lists() {
        assert!(resolve_seed_inputs(&tokens(&["lucky"])).is_err());
        assert!(resolve_seed_inputs(&tokens(&["0xZZ"])).is_err());
        assert!(resolve_seed_inputs(&[]).is_err());
    }
}
