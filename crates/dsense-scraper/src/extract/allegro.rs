//! Marketplace extraction from Allegro search-result pages.
//!
//! Operates over a bounded sample of listing fragments (top-N of the
//! result page). Per fragment, a price and a "kupiło N osób" sold-count
//! proxy are extracted independently; a fragment yielding neither still
//! counts toward the offer total, because offer count reflects sample
//! size, not extraction success. Fragment-level failures never abort
//! the remaining fragments. A page with zero fragments is the one hard
//! failure: no sample means no measurement, which is not the same as a
//! measurement with zero parsed prices.

use regex::Regex;

use dsense_core::MarketplaceMeasurement;

use super::first_success;
use crate::error::ScraperError;
use crate::numeric::parse_price;

/// Extracts aggregate marketplace metrics for one keyword's result page.
///
/// `sample_size` bounds how many listing fragments are analyzed (top-N
/// in page order). `keyword` only labels the error on an empty sample.
///
/// # Errors
///
/// Returns [`ScraperError::NoListings`] when the page contains no
/// listing fragments at all.
pub fn extract_listing_stats(
    html: &str,
    keyword: &str,
    sample_size: usize,
) -> Result<MarketplaceMeasurement, ScraperError> {
    let fragments = collect_fragments(html, sample_size);
    if fragments.is_empty() {
        return Err(ScraperError::NoListings {
            keyword: keyword.to_string(),
        });
    }

    let mut prices: Vec<f64> = Vec::new();
    let mut sold_counts: Vec<i64> = Vec::new();

    for fragment in &fragments {
        if let Some(price) = extract_price(fragment) {
            prices.push(price);
        }
        if let Some(sold) = extract_sold_count(fragment) {
            sold_counts.push(sold);
        }
    }

    #[allow(
        clippy::cast_precision_loss,
        reason = "sample sizes are tiny; f64 mean over them is exact enough"
    )]
    let avg_price = if prices.is_empty() {
        None
    } else {
        Some(prices.iter().sum::<f64>() / prices.len() as f64)
    };

    let sales_proxy = if sold_counts.is_empty() {
        None
    } else {
        Some(sold_counts.iter().sum())
    };

    Ok(MarketplaceMeasurement {
        avg_price,
        offer_count: i64::try_from(fragments.len()).unwrap_or(i64::MAX),
        sales_proxy,
    })
}

/// Collects up to `sample_size` listing fragments in page order.
///
/// `<article>` blocks are the primary listing container; result pages
/// that render offers as `data-box-name="offer"` divs are the fallback.
fn collect_fragments(html: &str, sample_size: usize) -> Vec<&str> {
    let article_re = Regex::new(r"(?is)<article\b.*?</article>").expect("valid article regex");

    let articles: Vec<&str> = article_re
        .find_iter(html)
        .take(sample_size)
        .map(|m| m.as_str())
        .collect();
    if !articles.is_empty() {
        return articles;
    }

    // Offer divs nest arbitrary markup, so a non-greedy `</div>` would
    // truncate at the first inner closing tag. Each fragment instead
    // runs from its opening tag to the next offer div, or end of input.
    let offer_open_re = Regex::new(r#"(?is)<div[^>]*data-box-name\s*=\s*["']offer["'][^>]*>"#)
        .expect("valid offer div regex");

    let starts: Vec<usize> = offer_open_re.find_iter(html).map(|m| m.start()).collect();
    starts
        .iter()
        .take(sample_size)
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(html.len());
            &html[start..end]
        })
        .collect()
}

/// Price extraction for one fragment: a price-classed span first, then a
/// decimal-comma amount with a currency marker in the visible text.
fn extract_price(fragment: &str) -> Option<f64> {
    first_success(fragment, &[price_from_span, price_from_text])
}

fn price_from_span(fragment: &str) -> Option<f64> {
    let span_re =
        Regex::new(r#"(?is)<span[^>]*class\s*=\s*["'][^"']*price[^"']*["'][^>]*>(.*?)</span>"#)
            .expect("valid price span regex");
    let tag_re = Regex::new(r"<[^>]+>").expect("valid tag-strip regex");

    let inner = span_re.captures(fragment)?.get(1)?.as_str();
    let text = tag_re.replace_all(inner, " ");
    parse_price(text.trim())
}

fn price_from_text(fragment: &str) -> Option<f64> {
    let amount_re =
        Regex::new(r"(?i)(\d+(?:\s\d{3})*,\d{2})\s*(?:zł|PLN)").expect("valid amount regex");

    let raw = amount_re.captures(fragment)?.get(1)?.as_str();
    parse_price(raw)
}

/// Sold-count proxy from the "kupiło N osób" disclosure.
///
/// The plural pattern covers `"kupiło 123 osoby"` and the hedged
/// `"kupiło ponad 100 osób"`. The singular `"kupiło 1 osoba"` is
/// irregular in the source language and matched as a second explicit
/// pattern rather than folded into the plural regex.
fn extract_sold_count(fragment: &str) -> Option<i64> {
    let plural_re = Regex::new(r"(?i)kupi[łl]o\s+(?:ponad\s+)?(\d+)\s+os[oó]b")
        .expect("valid sold-count regex");

    if let Some(captures) = plural_re.captures(fragment) {
        return captures.get(1)?.as_str().parse::<i64>().ok();
    }

    if fragment.to_lowercase().contains("kupiło 1 osoba") {
        return Some(1);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(body: &str) -> String {
        format!("<article data-role=\"offer\">{body}</article>")
    }

    #[test]
    fn aggregates_prices_and_sales_across_fragments() {
        let html = [
            listing(r#"<span class="mli-price">100,00 zł</span> kupiło ponad 50 osób"#),
            listing(r#"<span class="mli-price">200,00 zł</span>"#),
            listing("no price, no sales"),
        ]
        .join("\n");

        let m = extract_listing_stats(&html, "desk mat", 20).unwrap();

        assert_eq!(m.avg_price, Some(150.0));
        assert_eq!(m.offer_count, 3);
        assert_eq!(m.sales_proxy, Some(50));
    }

    #[test]
    fn offer_count_reflects_sample_size_not_parse_success() {
        let html = [listing("opis oferty"), listing("inna oferta")].join("\n");

        let m = extract_listing_stats(&html, "desk mat", 20).unwrap();

        assert_eq!(m.offer_count, 2);
        assert_eq!(m.avg_price, None, "no parseable price must be absent, not zero");
        assert_eq!(m.sales_proxy, None);
    }

    #[test]
    fn sample_is_bounded_to_top_n() {
        let html: String = (0..5)
            .map(|i| listing(&format!("<span class=\"price\">{i}0,00 zł</span>")))
            .collect::<Vec<_>>()
            .join("\n");

        let m = extract_listing_stats(&html, "desk mat", 3).unwrap();

        assert_eq!(m.offer_count, 3);
        // Mean of 00,00 / 10,00 / 20,00 — only the first three fragments.
        assert_eq!(m.avg_price, Some(10.0));
    }

    #[test]
    fn falls_back_to_offer_divs_when_no_articles() {
        let html = r#"<div data-box-name="offer"><span class="price">59,99 zł</span></div>"#;

        let m = extract_listing_stats(html, "desk mat", 20).unwrap();

        assert_eq!(m.offer_count, 1);
        assert_eq!(m.avg_price, Some(59.99));
    }

    #[test]
    fn offer_div_fragment_spans_nested_markup() {
        // The sold-count disclosure sits after an inner div; the
        // fragment must reach past it to the next offer.
        let html = concat!(
            r#"<div data-box-name="offer"><div class="inner">"#,
            r#"<span class="price">60,00 zł</span></div> kupiło ponad 30 osób</div>"#,
            r#"<div data-box-name="offer"><span class="price">40,00 zł</span></div>"#,
        );

        let m = extract_listing_stats(html, "desk mat", 20).unwrap();

        assert_eq!(m.offer_count, 2);
        assert_eq!(m.avg_price, Some(50.0));
        assert_eq!(m.sales_proxy, Some(30));
    }

    #[test]
    fn empty_page_is_a_hard_failure() {
        let result = extract_listing_stats("<html><body>0 wyników</body></html>", "desk mat", 20);

        assert!(
            matches!(result, Err(ScraperError::NoListings { ref keyword }) if keyword == "desk mat")
        );
    }

    #[test]
    fn price_text_fallback_without_price_span() {
        let html = listing("Lampka biurkowa 1 299,00 zł z wysyłką");

        let m = extract_listing_stats(&html, "rgb desk light", 20).unwrap();
        assert_eq!(m.avg_price, Some(1299.0));
    }

    #[test]
    fn sold_count_plural_and_hedged_variants() {
        assert_eq!(extract_sold_count("kupiło 123 osób"), Some(123));
        assert_eq!(extract_sold_count("kupiło ponad 100 osób"), Some(100));
        assert_eq!(extract_sold_count("Kupiło ponad 40 osób"), Some(40));
    }

    #[test]
    fn sold_count_irregular_singular() {
        assert_eq!(extract_sold_count("ostatnio kupiło 1 osoba"), Some(1));
        assert_eq!(extract_sold_count("nikt nie kupił"), None);
    }

    #[test]
    fn unparseable_price_still_counts_toward_offers() {
        let html = listing(r#"<span class="price">cena ukryta</span>"#);

        let m = extract_listing_stats(&html, "desk shelf", 20).unwrap();
        assert_eq!(m.offer_count, 1);
        assert_eq!(m.avg_price, None);
    }
}
