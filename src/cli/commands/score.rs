//! Score command implementation.

use crate::alignment::{jaccard, lcs_ratio, tokenize, word_order_score};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the score command.
pub fn run_score(a: &str, b: &str, settings: &Settings) -> Result<()> {
    let params = settings.alignment_params()?;
    let tokens_a = tokenize(a);
    let tokens_b = tokenize(b);

    Output::header("Similarity");
    Output::kv("Tokens A", &tokens_a.join(" "));
    Output::kv("Tokens B", &tokens_b.join(" "));
    Output::kv("Jaccard", &format!("{:.3}", jaccard(&tokens_a, &tokens_b)));
    Output::kv("LCS ratio", &format!("{:.3}", lcs_ratio(&tokens_a, &tokens_b)));
    Output::kv("Word order", &format!("{:.3}", word_order_score(&tokens_a, &tokens_b)));

    let combined = params.weights.score(&tokens_a, &tokens_b);
    Output::kv("Combined", &format!("{:.3}", combined));

    if combined < params.min_match_score {
        Output::warning(&format!(
            "Below the match floor ({}); the aligner would never pair these.",
            params.min_match_score
        ));
    }

    Ok(())
}
