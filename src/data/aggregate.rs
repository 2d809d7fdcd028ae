//! Aggregation Kernel
//! The handful of reductions every report view is built from: count by
//! year, explode-and-count, two-key counts and top-N by rating.
//!
//! Ties are resolved in first-encountered order: grouping keeps the order
//! in which keys first appear and every sort is stable.

use crate::data::schema::{self, COUNT};
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Occurrences of one category (genre, network, day, tag).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u32,
}

/// Number of dramas released in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i64,
    pub count: u32,
}

/// Number of dramas for one (year, category) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCategoryCount {
    pub year: i64,
    pub category: String,
    pub count: u32,
}

/// Episode count vs rating for one drama, with hover details.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DramaPoint {
    pub name: String,
    pub episodes: i64,
    pub rating: f64,
    pub genre: Option<String>,
    pub year: Option<i64>,
}

/// One row of the top-rated table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DramaSummary {
    pub name: String,
    pub rating: Option<f64>,
    pub genre: Option<String>,
    pub year: Option<i64>,
    pub network: Option<String>,
}

/// Stateless aggregation operations over the loaded table.
pub struct ViewAggregator;

impl ViewAggregator {
    /// Group by release year, count rows, ascending by year.
    /// Years without dramas are absent; rows without a year are skipped.
    pub fn count_by_year(df: &DataFrame) -> Result<Vec<YearCount>, AggregateError> {
        let counted = df
            .clone()
            .lazy()
            .filter(col(schema::YEAR).is_not_null())
            .group_by([col(schema::YEAR)])
            .agg([len().alias(COUNT)])
            .sort([schema::YEAR], SortMultipleOptions::default())
            .collect()?;

        let years = counted.column(schema::YEAR)?.i64()?;
        let counts = Self::counts(&counted)?;

        Ok(years
            .into_iter()
            .zip(counts)
            .filter_map(|(year, count)| Some(YearCount { year: year?, count }))
            .collect())
    }

    /// Split a comma separated column, trim tokens and count them,
    /// descending by count. `top_n = None` keeps every token.
    pub fn explode_count(
        df: &DataFrame,
        column: &str,
        top_n: Option<usize>,
    ) -> Result<Vec<CategoryCount>, AggregateError> {
        let tokens = df.clone().lazy().select([col(column)
            .str()
            .split(lit(","))
            .explode()
            .str()
            .strip_chars(lit(NULL))
            .alias(column)]);

        Self::count_values(tokens, column, top_n)
    }

    /// Most frequent non-null value of a column, first-seen on ties.
    pub fn most_frequent(df: &DataFrame, column: &str) -> Result<Option<String>, AggregateError> {
        let values = df.clone().lazy().select([col(column)]);
        let top = Self::count_values(values, column, Some(1))?;
        Ok(top.into_iter().next().map(|c| c.category))
    }

    /// Group jointly by release year and `category_col`, one row per
    /// observed pair, ascending by year then category.
    pub fn count_by_year_and(
        df: &DataFrame,
        category_col: &str,
    ) -> Result<Vec<YearCategoryCount>, AggregateError> {
        let counted = df
            .clone()
            .lazy()
            .filter(
                col(schema::YEAR)
                    .is_not_null()
                    .and(col(category_col).is_not_null()),
            )
            .group_by([col(schema::YEAR), col(category_col)])
            .agg([len().alias(COUNT)])
            .sort([schema::YEAR, category_col], SortMultipleOptions::default())
            .collect()?;

        let years = counted.column(schema::YEAR)?.i64()?;
        let categories = counted.column(category_col)?.str()?;
        let counts = Self::counts(&counted)?;

        Ok(years
            .into_iter()
            .zip(categories)
            .zip(counts)
            .filter_map(|((year, category), count)| {
                Some(YearCategoryCount {
                    year: year?,
                    category: category?.to_string(),
                    count,
                })
            })
            .collect())
    }

    /// Name, rating, genre, year and network of the `n` best rated
    /// dramas. Missing ratings sort last; equal ratings keep row order.
    pub fn top_by_rating(df: &DataFrame, n: usize) -> Result<Vec<DramaSummary>, AggregateError> {
        let top = df
            .clone()
            .lazy()
            .select([
                col(schema::NAME),
                col(schema::RATING),
                col(schema::GENRE),
                col(schema::YEAR),
                col(schema::NETWORK),
            ])
            .sort(
                [schema::RATING],
                SortMultipleOptions::default()
                    .with_order_descending(true)
                    .with_nulls_last(true)
                    .with_maintain_order(true),
            )
            .limit(n as IdxSize)
            .collect()?;

        let names = top.column(schema::NAME)?.str()?;
        let ratings = top.column(schema::RATING)?.f64()?;
        let genres = top.column(schema::GENRE)?.str()?;
        let years = top.column(schema::YEAR)?.i64()?;
        let networks = top.column(schema::NETWORK)?.str()?;

        let mut rows = Vec::with_capacity(top.height());
        for i in 0..top.height() {
            rows.push(DramaSummary {
                name: names.get(i).unwrap_or_default().to_string(),
                rating: ratings.get(i),
                genre: genres.get(i).map(str::to_string),
                year: years.get(i),
                network: networks.get(i).map(str::to_string),
            });
        }
        Ok(rows)
    }

    /// Episode count and rating of every drama that has both.
    pub fn episode_rating_points(df: &DataFrame) -> Result<Vec<DramaPoint>, AggregateError> {
        let points = df
            .clone()
            .lazy()
            .filter(
                col(schema::EPISODES)
                    .is_not_null()
                    .and(col(schema::RATING).is_not_null()),
            )
            .select([
                col(schema::NAME),
                col(schema::EPISODES),
                col(schema::RATING),
                col(schema::GENRE),
                col(schema::YEAR),
            ])
            .collect()?;

        let names = points.column(schema::NAME)?.str()?;
        let episodes = points.column(schema::EPISODES)?.i64()?;
        let ratings = points.column(schema::RATING)?.f64()?;
        let genres = points.column(schema::GENRE)?.str()?;
        let years = points.column(schema::YEAR)?.i64()?;

        let mut rows = Vec::with_capacity(points.height());
        for i in 0..points.height() {
            let (Some(episodes), Some(rating)) = (episodes.get(i), ratings.get(i)) else {
                continue;
            };
            rows.push(DramaPoint {
                name: names.get(i).unwrap_or_default().to_string(),
                episodes,
                rating,
                genre: genres.get(i).map(str::to_string),
                year: years.get(i),
            });
        }
        Ok(rows)
    }

    /// Value counts of a single string column, skipping nulls and empty
    /// strings, descending by count with first-seen order on ties.
    fn count_values(
        values: LazyFrame,
        column: &str,
        top_n: Option<usize>,
    ) -> Result<Vec<CategoryCount>, AggregateError> {
        let mut counted = values
            .filter(col(column).is_not_null().and(col(column).neq(lit(""))))
            .group_by_stable([col(column)])
            .agg([len().alias(COUNT)])
            .sort(
                [COUNT],
                SortMultipleOptions::default()
                    .with_order_descending(true)
                    .with_maintain_order(true),
            );
        if let Some(n) = top_n {
            counted = counted.limit(n as IdxSize);
        }
        let counted = counted.collect()?;

        let categories = counted.column(column)?.str()?;
        let counts = Self::counts(&counted)?;

        Ok(categories
            .into_iter()
            .zip(counts)
            .filter_map(|(category, count)| {
                Some(CategoryCount {
                    category: category?.to_string(),
                    count,
                })
            })
            .collect())
    }

    fn counts(df: &DataFrame) -> Result<Vec<u32>, AggregateError> {
        let counts = df.column(COUNT)?.cast(&DataType::UInt32)?;
        Ok(counts.u32()?.into_iter().map(|c| c.unwrap_or(0)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dramas() -> DataFrame {
        df!(
            schema::NAME => ["Drama A", "Drama B", "Drama C", "Drama D"],
            schema::YEAR => [Some(2019i64), Some(2015), Some(2019), None],
            schema::EPISODES => [Some(16i64), Some(12), None, Some(20)],
            schema::RATING => [Some(8.9f64), Some(9.2), Some(8.9), None],
            schema::GENRE => [Some("Romance, Comedy"), Some("Romance"), None, Some(" Thriller ,Romance,")],
            schema::NETWORK => ["tvN", "Netflix, tvN", "JTBC", "tvN"],
            schema::CONTENT_RATING => [Some("15+"), Some("18+"), Some("15+"), Some("15+")],
        )
        .unwrap()
    }

    #[test]
    fn count_by_year_is_ascending_and_skips_missing_years() {
        let counts = ViewAggregator::count_by_year(&dramas()).unwrap();
        assert_eq!(
            counts,
            vec![
                YearCount { year: 2015, count: 1 },
                YearCount { year: 2019, count: 2 },
            ]
        );
    }

    #[test]
    fn explode_count_trims_and_drops_empty_tokens() {
        let genres = ViewAggregator::explode_count(&dramas(), schema::GENRE, None).unwrap();
        assert_eq!(
            genres,
            vec![
                CategoryCount { category: "Romance".into(), count: 3 },
                CategoryCount { category: "Comedy".into(), count: 1 },
                CategoryCount { category: "Thriller".into(), count: 1 },
            ]
        );
        let pairs: u32 = genres.iter().map(|g| g.count).sum();
        assert_eq!(pairs, 5);
    }

    #[test]
    fn explode_count_takes_top_n() {
        let networks = ViewAggregator::explode_count(&dramas(), schema::NETWORK, Some(1)).unwrap();
        assert_eq!(networks, vec![CategoryCount { category: "tvN".into(), count: 3 }]);
    }

    #[test]
    fn most_frequent_prefers_first_seen_on_ties() {
        let df = df!(schema::NETWORK => [Some("KBS2"), Some("MBC"), None, Some("MBC"), Some("KBS2")])
            .unwrap();
        assert_eq!(
            ViewAggregator::most_frequent(&df, schema::NETWORK).unwrap(),
            Some("KBS2".to_string())
        );
    }

    #[test]
    fn two_key_counts_emit_only_observed_pairs() {
        let counts = ViewAggregator::count_by_year_and(&dramas(), schema::CONTENT_RATING).unwrap();
        assert_eq!(
            counts,
            vec![
                YearCategoryCount { year: 2015, category: "18+".into(), count: 1 },
                YearCategoryCount { year: 2019, category: "15+".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn top_by_rating_is_stable_and_puts_missing_last() {
        let top = ViewAggregator::top_by_rating(&dramas(), 10).unwrap();
        let names: Vec<_> = top.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Drama B", "Drama A", "Drama C", "Drama D"]);
        assert_eq!(top[3].rating, None);

        let top_two = ViewAggregator::top_by_rating(&dramas(), 2).unwrap();
        assert_eq!(top_two.len(), 2);
        assert_eq!(top_two[1].network.as_deref(), Some("tvN"));
    }

    #[test]
    fn scatter_points_need_episodes_and_rating() {
        let points = ViewAggregator::episode_rating_points(&dramas()).unwrap();
        let names: Vec<_> = points.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Drama A", "Drama B"]);
        assert_eq!(points[1].episodes, 12);
    }
}
