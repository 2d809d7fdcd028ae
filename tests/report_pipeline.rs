use kdrama_report::config::ReportSettings;
use kdrama_report::data::aggregate::{CategoryCount, YearCount};
use kdrama_report::data::{schema, DramaLoader, LoaderError};
use kdrama_report::report::{
    compute_report, narrative, ChartKind, DerivedTable, LegendPosition, Orientation, ReportCache,
};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const HEADER: &str = "Name,Year of release,Aired Date,Aired On,Number of Episode,Network,Duration,Content Rating,Synopsis,Cast,Genre,Tags,Rank,Rating";

fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

fn three_dramas() -> NamedTempFile {
    write_csv(&[
        r#"Drama A,2015,"Jan 1, 2015","Friday, Saturday",16,tvN,1 hr,15+ - Teens 15 or older,s,c,"Romance, Comedy","Love, Friendship",#3,8.7"#,
        r#"Drama B,2019,"Mar 2, 2019",Friday,12,,1 hr,18+ Restricted (violence & profanity),s,c,Romance,Revenge,#1,9.1"#,
        r#"Drama C,2019,"May 3, 2019",Monday,20,tvN,1 hr,15+ - Teens 15 or older,s,c,Thriller,"Friendship, Revenge",#2,8.9"#,
    ])
}

fn chapter_table(file: &NamedTempFile, index: usize) -> DerivedTable {
    let table = DramaLoader::read(file.path()).unwrap();
    let report = compute_report(&table, &ReportSettings::default()).unwrap();
    report.chapters[index].view.table.clone()
}

#[test]
fn counts_dramas_per_year() {
    let file = three_dramas();
    assert_eq!(
        chapter_table(&file, 0),
        DerivedTable::YearCounts(vec![
            YearCount { year: 2015, count: 1 },
            YearCount { year: 2019, count: 2 },
        ])
    );
}

#[test]
fn explodes_genres_before_counting() {
    let file = three_dramas();
    assert_eq!(
        chapter_table(&file, 2),
        DerivedTable::CategoryCounts(vec![
            CategoryCount { category: "Romance".into(), count: 2 },
            CategoryCount { category: "Comedy".into(), count: 1 },
            CategoryCount { category: "Thriller".into(), count: 1 },
        ])
    );
}

#[test]
fn fills_the_missing_network_before_counting_networks() {
    let file = three_dramas();
    let table = DramaLoader::read(file.path()).unwrap();
    assert_eq!(table.network_fill(), Some("tvN"));
    assert_eq!(table.frame().column(schema::NETWORK).unwrap().null_count(), 0);

    let report = compute_report(&table, &ReportSettings::default()).unwrap();
    assert_eq!(
        report.chapters[3].view.table,
        DerivedTable::CategoryCounts(vec![CategoryCount { category: "tvN".into(), count: 3 }])
    );
}

#[test]
fn air_days_keep_every_day() {
    let file = three_dramas();
    assert_eq!(
        chapter_table(&file, 4),
        DerivedTable::CategoryCounts(vec![
            CategoryCount { category: "Friday".into(), count: 2 },
            CategoryCount { category: "Saturday".into(), count: 1 },
            CategoryCount { category: "Monday".into(), count: 1 },
        ])
    );
}

#[test]
fn report_has_eight_chapters_in_reading_order() {
    let file = three_dramas();
    let table = DramaLoader::read(file.path()).unwrap();
    let report = compute_report(&table, &ReportSettings::default()).unwrap();

    let headings: Vec<&str> = report.chapters.iter().map(|c| c.heading).collect();
    assert_eq!(
        headings,
        vec![
            narrative::SURGE_HEADING,
            narrative::SHORT_HEADING,
            narrative::GENRE_HEADING,
            narrative::NETWORK_HEADING,
            narrative::RHYTHM_HEADING,
            narrative::BOLDNESS_HEADING,
            narrative::THEMES_HEADING,
            narrative::FAME_HEADING,
        ]
    );

    let kinds: Vec<ChartKind> = report.chapters.iter().map(|c| c.view.spec.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ChartKind::Bar,
            ChartKind::Scatter,
            ChartKind::Bar,
            ChartKind::Bar,
            ChartKind::Pie,
            ChartKind::Area,
            ChartKind::Bar,
            ChartKind::Table,
        ]
    );
    assert_eq!(report.chapters[4].view.spec.pull_largest, 0.1);
    assert_eq!(report.chapters[5].view.spec.legend, LegendPosition::Right);
    assert_eq!(report.chapters[6].view.spec.orientation, Orientation::Horizontal);

    assert_eq!(report.title, narrative::TITLE);
    assert_eq!(report.closing, vec![narrative::FAME_CAPTION, narrative::EPILOGUE]);
    assert_eq!(report.source_fingerprint, table.fingerprint());
}

#[test]
fn hall_of_fame_is_sorted_by_rating() {
    let file = three_dramas();
    let DerivedTable::TopDramas(rows) = chapter_table(&file, 7) else {
        panic!("hall of fame is not a drama table");
    };
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Drama B", "Drama C", "Drama A"]);
    assert_eq!(rows[0].network.as_deref(), Some("tvN"));
}

#[test]
fn top_lists_are_capped_and_never_exceed_the_source() {
    let rows: Vec<String> = (0..15)
        .map(|i| {
            format!(
                "Drama {i},{year},x,Friday,{eps},Net{i},1 hr,15+,s,c,Genre{i},Tag{i},#{i},{rating}",
                year = 2010 + i % 5,
                eps = 10 + i,
                rating = 8.0 + i as f64 / 100.0
            )
        })
        .collect();
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let file = write_csv(&refs);

    let table = DramaLoader::read(file.path()).unwrap();
    let report = compute_report(&table, &ReportSettings::default()).unwrap();

    for index in [2, 3, 6, 7] {
        assert_eq!(report.chapters[index].view.table.len(), 10, "chapter {}", index + 1);
    }
    for chapter in &report.chapters {
        assert!(chapter.view.table.len() <= table.height() || chapter.view.spec.kind == ChartKind::Pie);
    }

    let DerivedTable::TopDramas(top) = &report.chapters[7].view.table else {
        panic!("hall of fame is not a drama table");
    };
    assert_eq!(top[0].name, "Drama 14");
    assert!(top.windows(2).all(|w| w[0].rating >= w[1].rating));
}

#[test]
fn computing_twice_gives_the_same_report() {
    let file = three_dramas();
    let table = DramaLoader::read(file.path()).unwrap();
    let settings = ReportSettings::default();

    let first = compute_report(&table, &settings).unwrap();
    let second = compute_report(&table, &settings).unwrap();
    assert_eq!(first, second);
}

#[test]
fn cache_reuses_report_for_an_unchanged_file() {
    let file = three_dramas();
    let settings = ReportSettings::default();
    let mut cache = ReportCache::new();

    let first = cache
        .get_or_compute(&DramaLoader::read(file.path()).unwrap(), &settings)
        .unwrap();
    let again = cache
        .get_or_compute(&DramaLoader::read(file.path()).unwrap(), &settings)
        .unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &again));
    assert_eq!((cache.hits(), cache.misses()), (1, 1));

    let changed = write_csv(&[r#"Drama Z,2021,x,Sunday,8,JTBC,1 hr,15+,s,c,Drama,Tag,#1,9.5"#]);
    let other = cache
        .get_or_compute(&DramaLoader::read(changed.path()).unwrap(), &settings)
        .unwrap();
    assert!(!std::sync::Arc::ptr_eq(&first, &other));
    assert_eq!(cache.misses(), 2);
}

#[test]
fn missing_file_is_reported() {
    let err = DramaLoader::read(Path::new("does/not/exist.csv")).unwrap_err();
    assert!(matches!(err, LoaderError::FileNotFound(_)));
}
