//! Database tests for the sync jobs.
//!
//! Run with a PostgreSQL `DATABASE_URL`:
//! `cargo test -p campus-sync -- --ignored`

use campus_sync::{
    Snapshot, SnapshotSource, SourceElement, SourceGrade, SourceLaureat, SourceSituation,
    SourceStudent, SyncCounts, SyncJob, run_all, run_job,
};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

fn snapshot() -> Snapshot {
    Snapshot {
        students: vec![
            SourceStudent {
                cod_etu: "16004321".to_string(),
                lib_nom_pat_ind: "BENANI".to_string(),
                lib_pr1_ind: "Sara".to_string(),
                date_nai_ind: NaiveDate::from_ymd_opt(2001, 2, 1),
                cod_nne_ind: Some("R130045678".to_string()),
                cin_ind: None,
                cod_sex_etu: Some("F".to_string()),
                email: None,
                nb_inscriptions: 2,
            },
            SourceStudent {
                cod_etu: "16004322".to_string(),
                lib_nom_pat_ind: "OUAHBI".to_string(),
                lib_pr1_ind: "Karim".to_string(),
                date_nai_ind: None,
                cod_nne_ind: None,
                cin_ind: None,
                cod_sex_etu: None,
                email: None,
                nb_inscriptions: 1,
            },
        ],
        elements: vec![
            SourceElement {
                cod_elp: "JMDS1ALG".to_string(),
                lib_elp: "Algèbre 1".to_string(),
                cod_nel: Some("MOD".to_string()),
                nbr_crd_elp: Some(6.0),
            },
            SourceElement {
                cod_elp: "JLDN1A".to_string(),
                lib_elp: "Première année".to_string(),
                cod_nel: Some("AN".to_string()),
                nbr_crd_elp: None,
            },
        ],
        grades: vec![
            SourceGrade {
                cod_etu: "16004321".to_string(),
                cod_elp: "JMDS1ALG".to_string(),
                cod_anu: "2023".to_string(),
                cod_ses: "1".to_string(),
                note: Some(12.5),
                cod_tre: Some("V".to_string()),
            },
            SourceGrade {
                cod_etu: "16004322".to_string(),
                cod_elp: "JMDS1ALG".to_string(),
                cod_anu: "2024".to_string(),
                cod_ses: "1".to_string(),
                note: None,
                cod_tre: None,
            },
        ],
        // The first two rows share a key, as two steps of one contract do.
        situations: vec![
            situation("16004321", "JMDS1ALG", Some("JMD1")),
            situation("16004321", "JMDS1ALG", Some("JLD1")),
            situation("16004322", "JMDS1ALG", None),
        ],
        // Two versions of one diploma result, then a second diploma.
        laureats: vec![
            laureat("JLSMI", "Licence SMI", Some(12.25), Some("AB")),
            laureat("JLSMI", "Licence SMI", Some(13.5), Some("AB")),
            laureat("JDEUG", "DEUG SMI", None, None),
        ],
    }
}

fn situation(cod_etu: &str, cod_elp: &str, cod_etp: Option<&str>) -> SourceSituation {
    SourceSituation {
        cod_etu: cod_etu.to_string(),
        cod_elp: cod_elp.to_string(),
        cod_anu: "2024".to_string(),
        cod_etp: cod_etp.map(str::to_string),
    }
}

fn laureat(
    cod_dip: &str,
    lib_dip: &str,
    not_vdi: Option<f64>,
    cod_men: Option<&str>,
) -> SourceLaureat {
    SourceLaureat {
        cod_etu: "16004321".to_string(),
        cod_dip: cod_dip.to_string(),
        lib_dip: lib_dip.to_string(),
        cod_anu: "2024".to_string(),
        not_vdi,
        cod_men: cod_men.map(str::to_string),
    }
}

async fn updated_at_snapshot(pool: &PgPool) -> Vec<(String, DateTime<Utc>)> {
    sqlx::query_as(
        r#"SELECT cod_etu, updated_at FROM students
           UNION ALL SELECT cod_elp, updated_at FROM element_pedagogi
           UNION ALL SELECT cod_etu || cod_elp || cod_anu || cod_ses, updated_at FROM grades
           UNION ALL SELECT 'S' || cod_etu || cod_elp || cod_anu, updated_at FROM pedagogical_situation
           UNION ALL SELECT 'L' || cod_etu || cod_dip || cod_anu, updated_at FROM laureats
           ORDER BY 1, 2"#,
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn rerun_on_unchanged_data_writes_nothing(pool: PgPool) {
    let source = SnapshotSource::new(snapshot());

    let first = run_all(&pool, &source, None).await.unwrap();
    assert_eq!(first[0].counts.inserted, 2);
    let situation = &first[3];
    assert_eq!(situation.job, SyncJob::Situation);
    assert_eq!((situation.counts.fetched, situation.counts.inserted), (3, 2));
    let laureats = &first[4];
    assert_eq!((laureats.counts.fetched, laureats.counts.inserted), (3, 2));
    let before = updated_at_snapshot(&pool).await;

    let second = run_all(&pool, &source, None).await.unwrap();
    for report in &second {
        assert_eq!(report.counts.inserted, 0, "{} inserted rows", report.job);
        assert_eq!(report.counts.updated, 0, "{} updated rows", report.job);
        assert_eq!(report.counts.unchanged, report.counts.fetched);
    }
    assert_eq!(updated_at_snapshot(&pool).await, before);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn duplicate_situation_keys_settle_on_one_row(pool: PgPool) {
    let rows = vec![
        situation("1", "JMDS1ALG", Some("JMD1")),
        situation("1", "JMDS1ALG", Some("JLD1")),
    ];
    let mut reversed = rows.clone();
    reversed.reverse();

    for batch in [rows.clone(), rows, reversed] {
        let source = SnapshotSource::new(Snapshot {
            situations: batch,
            ..Snapshot::default()
        });
        run_job(&pool, &source, SyncJob::Situation, None).await.unwrap();
    }

    let stored: Vec<Option<String>> =
        sqlx::query_scalar("SELECT cod_etp FROM pedagogical_situation")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(stored, vec![Some("JLD1".to_string())]);

    let report = run_job(
        &pool,
        &SnapshotSource::new(Snapshot {
            situations: vec![
                situation("1", "JMDS1ALG", Some("JLD1")),
                situation("1", "JMDS1ALG", Some("JMD1")),
            ],
            ..Snapshot::default()
        }),
        SyncJob::Situation,
        None,
    )
    .await
    .unwrap();
    assert_eq!(
        report.counts,
        SyncCounts {
            fetched: 2,
            inserted: 0,
            updated: 0,
            unchanged: 2
        }
    );
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn changed_row_is_updated(pool: PgPool) {
    run_job(&pool, &SnapshotSource::new(snapshot()), SyncJob::Grades, None)
        .await
        .unwrap();

    let mut changed = snapshot();
    changed.grades[1].note = Some(9.0);
    changed.grades[1].cod_tre = Some("NV".to_string());
    let report = run_job(&pool, &SnapshotSource::new(changed), SyncJob::Grades, None)
        .await
        .unwrap();

    assert_eq!(
        report.counts,
        SyncCounts {
            fetched: 2,
            inserted: 0,
            updated: 1,
            unchanged: 1
        }
    );
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn grades_year_filter_and_sync_log(pool: PgPool) {
    let report = run_job(
        &pool,
        &SnapshotSource::new(snapshot()),
        SyncJob::Grades,
        Some("2024"),
    )
    .await
    .unwrap();
    assert_eq!(report.counts.fetched, 1);

    let (status, inserted): (String, i32) =
        sqlx::query_as("SELECT status, inserted FROM sync_log WHERE id = $1")
            .bind(report.log_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(status, "success");
    assert_eq!(inserted, 1);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn elements_are_classified_on_the_way_in(pool: PgPool) {
    run_job(&pool, &SnapshotSource::new(snapshot()), SyncJob::Elements, None)
        .await
        .unwrap();

    let rows: Vec<(String, Option<i16>, Option<i16>, String)> = sqlx::query_as(
        "SELECT cod_elp, semester_number, year_level, element_type FROM element_pedagogi ORDER BY cod_elp",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert_eq!(
        rows,
        vec![
            ("JLDN1A".to_string(), None, Some(1), "yearly".to_string()),
            ("JMDS1ALG".to_string(), Some(1), Some(1), "semester".to_string()),
        ]
    );

    let (examined, changed) = campus_sync::classify_elements(&pool).await.unwrap();
    assert_eq!((examined, changed), (2, 0));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a PostgreSQL database"]
async fn failed_job_rolls_back_and_is_logged(pool: PgPool) {
    let mut bad = snapshot();
    // Exceeds VARCHAR(4) on cod_anu after the first row went in.
    bad.grades[1].cod_anu = "2024-2025".to_string();

    let err = run_job(&pool, &SnapshotSource::new(bad), SyncJob::Grades, None).await;
    assert!(err.is_err());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM grades")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);

    let status: String =
        sqlx::query_scalar("SELECT status FROM sync_log ORDER BY id DESC LIMIT 1")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(status, "failed");
}
