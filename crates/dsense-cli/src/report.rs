//! Plain-text range reports over the collected series.

use chrono::NaiveDate;
use clap::Subcommand;
use sqlx::SqlitePool;

#[derive(Debug, Subcommand)]
pub(crate) enum ReportKind {
    /// Social engagement metrics (views/videos/likes per hashtag).
    Social {
        /// Inclusive start date, YYYY-MM-DD.
        #[arg(long)]
        from: String,
        /// Inclusive end date, YYYY-MM-DD.
        #[arg(long)]
        to: String,
        /// Restrict to one platform, e.g. "TikTok".
        #[arg(long)]
        platform: Option<String>,
    },
    /// Marketplace metrics (avg price/offers/sales proxy per keyword).
    Marketplace {
        /// Inclusive start date, YYYY-MM-DD.
        #[arg(long)]
        from: String,
        /// Inclusive end date, YYYY-MM-DD.
        #[arg(long)]
        to: String,
        /// Restrict to one product keyword.
        #[arg(long)]
        keyword: Option<String>,
    },
}

pub(crate) async fn run(pool: &SqlitePool, kind: ReportKind) -> anyhow::Result<()> {
    match kind {
        ReportKind::Social {
            from,
            to,
            platform,
        } => {
            let (from, to) = parse_range(&from, &to)?;
            let rows =
                dsense_db::query_social_metrics(pool, from, to, platform.as_deref()).await?;

            println!(
                "{:<12} {:<10} {:<24} {:>14} {:>10} {:>12}",
                "date", "platform", "hashtag", "views", "videos", "likes"
            );
            for row in rows {
                println!(
                    "{:<12} {:<10} {:<24} {:>14} {:>10} {:>12}",
                    row.date,
                    row.platform,
                    row.hashtag,
                    fmt_opt(row.views),
                    fmt_opt(row.videos),
                    fmt_opt(row.likes),
                );
            }
        }
        ReportKind::Marketplace { from, to, keyword } => {
            let (from, to) = parse_range(&from, &to)?;
            let rows =
                dsense_db::query_marketplace_metrics(pool, from, to, keyword.as_deref()).await?;

            println!(
                "{:<12} {:<24} {:>10} {:>8} {:>12}",
                "date", "keyword", "avg_price", "offers", "sales_proxy"
            );
            for row in rows {
                println!(
                    "{:<12} {:<24} {:>10} {:>8} {:>12}",
                    row.date,
                    row.keyword,
                    row.avg_price
                        .map_or_else(|| "-".to_string(), |p| format!("{p:.2}")),
                    fmt_opt(row.offer_count),
                    fmt_opt(row.sales_proxy),
                );
            }
        }
    }
    Ok(())
}

fn parse_range(from: &str, to: &str) -> anyhow::Result<(NaiveDate, NaiveDate)> {
    let from = parse_date(from)?;
    let to = parse_date(to)?;
    if from > to {
        anyhow::bail!("--from {from} is after --to {to}");
    }
    Ok((from, to))
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date \"{raw}\" (expected YYYY-MM-DD): {e}"))
}

fn fmt_opt(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso() {
        assert_eq!(
            parse_date("2026-08-29").unwrap(),
            NaiveDate::from_ymd_opt(2026, 8, 29).unwrap()
        );
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn parse_range_rejects_inverted_bounds() {
        assert!(parse_range("2026-08-29", "2026-08-01").is_err());
    }
}
