fn fixture(name: &str) -> std::fs::File {
    std::fs::File::open(std::path::Path::new("tests").join("fixtures").join(name)).unwrap()
}

#[test]
fn normalize_column() {
    for (input, expected) in [
        ("\u{feff} date ", "DATE"),
        ("Ket.PV", "KET.PV"),
        ("jumlah\u{a0}", "JUMLAH"),
        ("  SAFETY STOCK", "SAFETY STOCK"),
    ] {
        assert_eq!(kastool::normalize_column(input), expected, "{input:?}");
    }
}

mod rupiah {
    use kastool::rupiah::{self, format_rp, format_rp_or_zero, FormatClass, Report};

    #[test]
    fn parse_amounts_resolves_every_convention() {
        for (input, expected) in [
            ("1,234", 1234),
            ("12,345,678", 12345678),
            ("1.234.567", 1234567),
            ("1.234,50", 1234),
            ("38,00", 38000),
            ("999,99", 999990),
            ("0,75", 750),
            ("Rp 45.000", 45000),
            ("Rp\u{a0}1.000.000", 1000000),
            ("\u{feff}2,500,000", 2500000),
            ("", 0),
            ("nan", 0),
            ("None", 0),
            ("abc123xyz", 123),
            ("no digits at all", 0),
            ("12", 12),
            ("  Rp 12.500  ", 12500),
            // u64 overflow degrades to 0 instead of failing the report
            ("99999999999999999999999999", 0),
        ] {
            assert_eq!(rupiah::parse_amounts([input]), vec![expected], "{input:?}");
        }
    }

    #[test]
    fn classification_is_exclusive() {
        use FormatClass::*;
        for (input, expected) in [
            ("1,234", MultiComma),
            ("123,456,789", MultiComma),
            ("1.234", IdDot),
            ("1.234.567,89", IdDot),
            ("38,00", TwoDecComma),
            ("1,23", TwoDecComma),
            // near misses of the anchored patterns all land in the catch-all
            ("1,2345", Fallback),
            ("1234", Fallback),
            ("1.2.3", Fallback),
            ("1234,567", Fallback),
            (",", Fallback),
        ] {
            assert_eq!(rupiah::classify(input), expected, "{input:?}");
        }
    }

    #[test]
    fn batch_output_is_positional() {
        assert_eq!(
            rupiah::parse_amounts(["1,234", "", "38,00"]),
            vec![1234, 0, 38000]
        );
    }

    #[test]
    fn report_counts_suspicious_values() {
        let outcome = rupiah::parse_amounts_report(["1.000", "abc9", "nan", "None", "x"]);
        assert_eq!(outcome.amounts, vec![1000, 9, 0, 0, 0]);
        assert_eq!(
            outcome.report,
            Report {
                missing: 2,
                fallback_hits: 2,
                parse_failures: 0,
            }
        );
        assert!(!outcome.report.is_clean());
        assert!(rupiah::parse_amounts_report(["1.000"]).report.is_clean());
    }

    #[test]
    fn format_rp_groups_thousands_with_dots() {
        assert_eq!(format_rp(1234567), "Rp 1.234.567");
        assert_eq!(format_rp(1000), "Rp 1.000");
        assert_eq!(format_rp(999), "Rp 999");
        assert_eq!(format_rp(0), "Rp 0");
        assert_eq!(format_rp(-98765), "Rp -98.765");
        assert_eq!(format_rp_or_zero(None), "Rp 0");
        assert_eq!(format_rp_or_zero(Some(12)), "Rp 12");
    }

    #[test]
    fn display_strings_are_not_canonical_input() {
        // the comma-decimal remainder is dropped at parse time, so raw text
        // never survives a parse/format cycle verbatim; that is accepted
        let parsed = rupiah::parse_amounts(["1.234,50"])[0];
        assert_eq!(parsed, 1234);
        assert_eq!(format_rp(parsed as i64), "Rp 1.234");
    }
}

mod ledger {
    use super::fixture;
    use kastool::filter::{CompiledFilter, Filter};
    use kastool::ledger::{Error, Tipe};
    use kastool::rupiah::Report;
    use kastool::table::Table;

    fn petty_cash() -> Table {
        Table::from_reader(fixture("petty_cash.csv")).unwrap()
    }

    fn compiled(filter: Filter) -> CompiledFilter {
        filter.compile().unwrap()
    }

    #[test]
    fn headers_are_normalized_on_ingestion() {
        assert_eq!(
            petty_cash().headers().to_vec(),
            [
                "DATE",
                "KETERANGAN",
                "DESKRIPSI",
                "PROJECT/PJ",
                "KET.PV",
                "TIPE",
                "JUMLAH"
            ]
        );
    }

    #[test]
    fn rows_are_date_sorted_with_running_balance() {
        let view = kastool::ledger_view(&petty_cash(), &CompiledFilter::default()).unwrap();
        let balances: Vec<i64> = view.rows.iter().map(|row| row.balance).collect();
        assert_eq!(
            balances,
            [1000000, 850000, 812000, 787000, 1287000, 1287000]
        );
        assert_eq!(view.rows[1].keterangan, "Beli ATK", "feed order is not kept");
        assert_eq!(view.rows[3].tipe, Tipe::Out, "lowercase TIPE cells count");
        assert!(view.rows.last().unwrap().date.is_none(), "undated rows sort last");
        assert_eq!(view.summary.final_balance, 1287000);
        assert_eq!(
            view.report,
            Report {
                missing: 1,
                fallback_hits: 1,
                parse_failures: 0,
            }
        );
    }

    #[test]
    fn final_balance_is_immune_to_filtering() {
        let table = petty_cash();
        let filters = [
            Filter::default(),
            Filter {
                tipe: Some("OUT".into()),
                ..Default::default()
            },
            Filter {
                from: Some("03/02/2026".into()),
                to: Some("05/02/2026".into()),
                ..Default::default()
            },
            Filter {
                search: Some("atk".into()),
                ..Default::default()
            },
            Filter {
                from: Some("01/02/2026".into()),
                tipe: Some("IN".into()),
                search: Some("umum".into()),
                ..Default::default()
            },
        ];
        for filter in filters {
            let view = kastool::ledger_view(&table, &compiled(filter.clone())).unwrap();
            assert_eq!(
                view.summary.final_balance, 1287000,
                "filter {filter:?} changed the closing balance"
            );
        }
    }

    #[test]
    fn direction_filter_totals() {
        let view = kastool::ledger_view(
            &petty_cash(),
            &compiled(Filter {
                tipe: Some("OUT".into()),
                ..Default::default()
            }),
        )
        .unwrap();
        assert_eq!(view.summary.transactions, 3);
        assert_eq!(view.summary.total_in, 0);
        assert_eq!(view.summary.total_out, 213000);
        assert_eq!(view.summary.net, -213000);
    }

    #[test]
    fn date_range_excludes_undated_rows() {
        let view = kastool::ledger_view(
            &petty_cash(),
            &compiled(Filter {
                from: Some("01/02/2026".into()),
                to: Some("05/02/2026".into()),
                ..Default::default()
            }),
        )
        .unwrap();
        assert_eq!(view.summary.transactions, 4);
        assert_eq!(view.summary.total_in, 1000000);
        assert_eq!(view.summary.total_out, 213000);
        assert_eq!(view.summary.net, 787000);
    }

    #[test]
    fn search_spans_the_descriptive_columns() {
        let table = petty_cash();
        for (keyword, expected) in [
            ("atk", 1),      // KETERANGAN
            ("ongkir", 1),   // DESKRIPSI
            ("project-b", 1) // PROJECT/PJ
        ] {
            let view = kastool::ledger_view(
                &table,
                &compiled(Filter {
                    search: Some(keyword.into()),
                    ..Default::default()
                }),
            )
            .unwrap();
            assert_eq!(view.summary.transactions, expected, "keyword {keyword:?}");
        }
    }

    #[test]
    fn missing_required_columns_are_reported() {
        let table = Table::from_reader("DATE,JUMLAH\n1/1/2026,10\n".as_bytes()).unwrap();
        let err = kastool::ledger_view(&table, &CompiledFilter::default()).unwrap_err();
        let Error::MissingColumns { missing, available } = err;
        assert_eq!(missing, ["KETERANGAN", "TIPE"]);
        assert_eq!(available, ["DATE", "JUMLAH"]);
    }

    #[test]
    fn running_balance_saturates_instead_of_overflowing() {
        let csv = format!(
            "DATE,KETERANGAN,TIPE,JUMLAH\n01/02/2026,Setoran satu,IN,{max}\n02/02/2026,Setoran dua,IN,{max}\n",
            max = i64::MAX
        );
        let table = Table::from_reader(csv.as_bytes()).unwrap();
        let view = kastool::ledger_view(&table, &CompiledFilter::default()).unwrap();
        assert_eq!(view.rows[0].balance, i64::MAX);
        assert_eq!(view.rows[1].balance, i64::MAX);
        assert_eq!(view.summary.final_balance, i64::MAX);
    }

    #[test]
    fn signed_amounts_follow_the_direction() {
        assert_eq!(Tipe::from_raw(" in "), Tipe::In);
        assert_eq!(Tipe::from_raw("OUT"), Tipe::Out);
        assert_eq!(Tipe::from_raw("LAINNYA"), Tipe::Other);
        assert_eq!(Tipe::In.signed(500), 500);
        assert_eq!(Tipe::Out.signed(500), -500);
        assert_eq!(Tipe::Other.signed(500), 0);
    }
}

mod filter {
    use super::fixture;
    use kastool::filter::{Error, Filter, TipeFilter};

    #[test]
    fn serde() {
        let filter = Filter {
            from: Some("01/02/2026".into()),
            to: None,
            tipe: Some("OUT".into()),
            search: Some("atk".into()),
        };
        let data = ron::ser::to_string_pretty(
            &filter,
            ron::ser::PrettyConfig::new().struct_names(true),
        )
        .unwrap();
        assert_eq!(ron::from_str::<Filter>(&data).unwrap(), filter, "round-trip works");
    }

    #[test]
    fn preset_file_compiles_and_applies() {
        let preset: Filter = ron::de::from_reader(fixture("filter.ron")).unwrap();
        let compiled = preset.compile().unwrap();
        assert_eq!(compiled.tipe, TipeFilter::Out);
        let table = kastool::table::Table::from_reader(fixture("petty_cash.csv")).unwrap();
        let view = kastool::ledger_view(&table, &compiled).unwrap();
        assert_eq!(view.summary.transactions, 3);
    }

    #[test]
    fn invalid_fields_are_rejected() {
        let err = Filter {
            from: Some("tomorrow".into()),
            ..Default::default()
        }
        .compile()
        .unwrap_err();
        assert!(matches!(err, Error::InvalidDate { .. }));

        let err = Filter {
            tipe: Some("SIDEWAYS".into()),
            ..Default::default()
        }
        .compile()
        .unwrap_err();
        assert!(matches!(err, Error::InvalidTipe { .. }));
    }

    #[test]
    fn day_first_dates() {
        use time::macros::date;
        for (input, expected) in [
            ("01/02/2026", Some(date!(2026 - 02 - 01))),
            ("1/2/2026", Some(date!(2026 - 02 - 01))),
            ("01-02-2026", Some(date!(2026 - 02 - 01))),
            ("2026-02-01", Some(date!(2026 - 02 - 01))),
            ("02/01/2026", Some(date!(2026 - 01 - 02))),
            ("31/02/2026", None),
            ("soon", None),
        ] {
            assert_eq!(kastool::filter::parse_day_first(input), expected, "{input:?}");
        }
    }
}

mod request {
    use super::fixture;
    use kastool::table::Table;

    fn requests() -> Table {
        Table::from_reader(fixture("purchase_request.csv")).unwrap()
    }

    #[test]
    fn totals_cover_the_whole_feed() {
        let view = kastool::request_view(&requests(), None);
        assert_eq!(view.total_estimation, 3375000);
        assert_eq!(view.item_count, 4);
        assert_eq!(view.projects, ["PROJECT-A", "PROJECT-B"]);
        assert_eq!(view.visible, [0, 1, 2, 3]);
        assert_eq!(view.subtotals.as_deref(), Some(&[2500000, 750000, 125000, 0][..]));
        assert_eq!(view.report.missing, 1);
    }

    #[test]
    fn project_filter_narrows_rows_but_not_totals() {
        let view = kastool::request_view(&requests(), Some("PROJECT-A"));
        assert_eq!(view.visible, [0, 2]);
        assert_eq!(view.total_estimation, 3375000);
        assert_eq!(view.item_count, 4);

        let all = kastool::request_view(&requests(), Some("ALL"));
        assert_eq!(all.visible, [0, 1, 2, 3]);
    }

    #[test]
    fn feed_without_subtotal_totals_to_zero() {
        let table = Table::from_reader("ITEM\nBesi\n".as_bytes()).unwrap();
        let view = kastool::request_view(&table, None);
        assert_eq!(view.total_estimation, 0);
        assert!(view.subtotals.is_none());
        assert!(view.projects.is_empty());
        assert_eq!(view.visible, [0]);
    }
}

mod stock {
    use super::fixture;
    use kastool::stock::{to_number, RestockFlag};
    use kastool::table::Table;

    #[test]
    fn flags_counts_and_priority() {
        let table = Table::from_reader(fixture("cutting_stock.csv")).unwrap();
        let view = kastool::stock_view(&table);
        use RestockFlag::*;
        assert_eq!(
            view.flags.as_deref(),
            Some(&[NeedsRestock, Sufficient, NeedsRestock, NeedsRestock, Sufficient][..])
        );
        assert_eq!(view.restock_count, 3);
        assert_eq!(view.sufficient_count, 2);
        assert_eq!(view.restock_priority, [3, 0, 2], "lowest quantity first");
    }

    #[test]
    fn quantities_coerce_with_zero_default() {
        assert_eq!(to_number(" 7 "), 7.0);
        assert_eq!(to_number("2.5"), 2.5);
        assert_eq!(to_number(""), 0.0);
        assert_eq!(to_number("banyak"), 0.0);
        // both sides zero still flags: 0 <= 0
        assert_eq!(RestockFlag::evaluate(0.0, 0.0), RestockFlag::NeedsRestock);
        assert_eq!(RestockFlag::evaluate(10.0, 10.0), RestockFlag::NeedsRestock);
        assert_eq!(RestockFlag::evaluate(11.0, 10.0), RestockFlag::Sufficient);
    }

    #[test]
    fn feed_without_quantity_columns_is_left_unflagged() {
        let table = Table::from_reader("ITEM,QTY\nPlat,4\n".as_bytes()).unwrap();
        let view = kastool::stock_view(&table);
        assert!(view.flags.is_none());
        assert_eq!(view.restock_count, 0);
        assert_eq!(view.sufficient_count, 0);
        assert!(view.restock_priority.is_empty());
    }
}

mod feeds {
    use super::fixture;
    use kastool::feeds::{load_feeds, FeedCache, Feeds};
    use std::convert::Infallible;
    use std::time::Duration;

    fn empty_feeds() -> Feeds {
        load_feeds(&b""[..], &b""[..], &b""[..]).unwrap()
    }

    #[test]
    fn all_three_feeds_load_in_one_snapshot() {
        let feeds = load_feeds(
            fixture("petty_cash.csv"),
            fixture("purchase_request.csv"),
            fixture("cutting_stock.csv"),
        )
        .unwrap();
        assert_eq!(feeds.petty_cash.len(), 6);
        assert_eq!(feeds.purchase_requests.len(), 4);
        assert_eq!(feeds.stock.len(), 5);
        assert_eq!(feeds.petty_cash.headers()[0], "DATE");
    }

    #[test]
    fn cache_serves_fresh_data_without_reloading() {
        let mut cache = FeedCache::new(Duration::from_secs(60));
        let mut loads = 0;
        for _ in 0..3 {
            cache
                .get_or_load(|| {
                    loads += 1;
                    Ok::<_, Infallible>(empty_feeds())
                })
                .unwrap();
        }
        assert_eq!(loads, 1, "a fresh cache is not reloaded");

        cache.clear();
        cache
            .get_or_load(|| {
                loads += 1;
                Ok::<_, Infallible>(empty_feeds())
            })
            .unwrap();
        assert_eq!(loads, 2, "clearing forces a reload");
    }

    #[test]
    fn expired_cache_reloads() {
        let mut cache = FeedCache::new(Duration::ZERO);
        let mut loads = 0;
        for _ in 0..2 {
            cache
                .get_or_load(|| {
                    loads += 1;
                    Ok::<_, Infallible>(empty_feeds())
                })
                .unwrap();
        }
        assert_eq!(loads, 2, "a zero TTL never serves from cache");
    }
}

mod style {
    use kastool::stock::RestockFlag;
    use kastool::style;

    #[test]
    fn categorical_values_map_to_styles() {
        assert!(style::pv_style("SUDAH BUAT PV").is_some());
        assert_eq!(
            style::pv_style(" sudah buat pv "),
            style::pv_style("SUDAH BUAT PV"),
            "matching is case- and whitespace-insensitive"
        );
        assert!(style::pv_style("BELUM BUAT PV").is_some());
        assert_ne!(
            style::pv_style("SUDAH BUAT PV"),
            style::pv_style("BELUM BUAT PV")
        );
        assert_eq!(style::pv_style("-"), None);
        assert_ne!(
            style::restock_style(RestockFlag::NeedsRestock),
            style::restock_style(RestockFlag::Sufficient)
        );
    }
}
