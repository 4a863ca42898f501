// src/integration_tests.rs
//
// Testes contra um Postgres real. Rodam com:
//   DATABASE_URL=postgres://... cargo test -- --ignored

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    config::{AppState, Config},
    models::{
        attendance::{AttendanceInput, AttendanceQuery, AttendanceStatus, MonthlyAttendanceQuery},
        auth::{AccountCredentials, Principal, Role},
        franchise::{CreateFranchisePayload, Franchise},
        scope::Scope,
        staff::{CreateStaffPayload, StaffRole},
        status::{FranchiseStatus, RecordStatus},
        student::CreateStudentPayload,
    },
    services::deletion::PrincipalCleanup,
};

fn state_for(pool: PgPool) -> AppState {
    let config = Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://unused".to_string()),
        "JWT_SECRET" => Some("integration-secret".to_string()),
        _ => None,
    })
    .unwrap();
    AppState::from_pool(pool, &config).0
}

async fn franchise(state: &AppState, name: &str, head: Option<&str>) -> Franchise {
    state
        .franchise_service
        .create(CreateFranchisePayload {
            name: name.to_string(),
            location: "Pune".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            status: FranchiseStatus::Active,
            head: head.map(|email| AccountCredentials { email: email.to_string(), password: "secret1".to_string() }),
        })
        .await
        .unwrap()
}

async fn student(state: &AppState, franchise_id: i64, email: &str, batch: &str, status: RecordStatus) {
    state
        .student_service
        .create(
            &Scope::Unrestricted,
            CreateStudentPayload {
                name: email.to_string(),
                email: email.to_string(),
                phone: "9876543210".to_string(),
                batch: batch.to_string(),
                franchise_id: Some(franchise_id),
                fees_paid: Decimal::ZERO,
                fees_pending: Decimal::ZERO,
                status,
            },
        )
        .await
        .unwrap();
}

async fn principal(pool: &PgPool, email: &str) -> Option<Principal> {
    sqlx::query_as::<_, Principal>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
        .unwrap()
}

async fn staff_member(state: &AppState, franchise_id: i64, email: &str, phone: &str, batch: Option<&str>) {
    state
        .staff_service
        .create(
            &Scope::Unrestricted,
            CreateStaffPayload {
                name: email.to_string(),
                email: email.to_string(),
                password: "secret1".to_string(),
                phone: phone.to_string(),
                salary: Decimal::new(25000, 0),
                role: StaffRole::Instructor,
                status: RecordStatus::Active,
                batch: batch.map(str::to_string),
                franchise_id: Some(franchise_id),
            },
        )
        .await
        .unwrap();
}

async fn attendance_rows(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM attendance_records")
        .fetch_one(pool)
        .await
        .unwrap()
}

fn mark(franchise: Option<i64>, person_id: i64, date: &str, status: &str) -> AttendanceInput {
    AttendanceInput {
        franchise,
        person_type: Some("staff".to_string()),
        person_id: Some(person_id),
        date: Some(date.to_string()),
        status: Some(status.to_string()),
        in_time: Some("09:00".to_string()),
        out_time: None,
    }
}

#[sqlx::test]
#[ignore]
async fn resubmitting_attendance_overwrites_the_same_day(pool: PgPool) {
    let state = state_for(pool.clone());
    let f = franchise(&state, "Wagholi", None).await;
    let scope = Scope::SingleFranchise { franchise_id: f.id };

    let first = state
        .attendance_service
        .upsert_attendance(&scope, vec![mark(None, 42, "2024-05-01", "Present")])
        .await
        .unwrap();
    let second = state
        .attendance_service
        .upsert_attendance(&scope, vec![mark(None, 42, "2024-05-01", "Late")])
        .await
        .unwrap();

    assert_eq!(first[0].record.id, second[0].record.id);
    assert_eq!(second[0].record.status, AttendanceStatus::Late);
    assert_eq!(second[0].staff_id, 42);

    assert_eq!(attendance_rows(&pool).await, 1);
}

#[sqlx::test]
#[ignore]
async fn scoped_upsert_ignores_the_supplied_franchise(pool: PgPool) {
    let state = state_for(pool.clone());
    let own = franchise(&state, "Own", None).await;
    let other = franchise(&state, "Other", None).await;
    let scope = Scope::FranchiseAndBatch { franchise_id: own.id, batch: None };

    let saved = state
        .attendance_service
        .upsert_attendance(&scope, vec![mark(Some(other.id), 7, "2024-05-02", "Present")])
        .await
        .unwrap();
    assert_eq!(saved[0].record.franchise_id, own.id);

    let in_other: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance_records WHERE franchise_id = $1")
        .bind(other.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(in_other, 0);
}

#[sqlx::test]
#[ignore]
async fn invalid_batch_writes_nothing(pool: PgPool) {
    let state = state_for(pool.clone());
    let f = franchise(&state, "Wagholi", None).await;
    let scope = Scope::SingleFranchise { franchise_id: f.id };

    let err = state
        .attendance_service
        .upsert_attendance(
            &scope,
            vec![mark(None, 1, "2024-05-01", "Present"), mark(None, 2, "2024-05-01", "Sick")],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FieldErrors(_)));

    assert_eq!(attendance_rows(&pool).await, 0);
}

#[sqlx::test]
#[ignore]
async fn franchise_head_only_sees_own_students(pool: PgPool) {
    let state = state_for(pool.clone());
    let mine = franchise(&state, "Mine", Some("head@mine.com")).await;
    let theirs = franchise(&state, "Theirs", None).await;
    student(&state, mine.id, "a@mine.com", "B1", RecordStatus::Active).await;
    student(&state, theirs.id, "b@theirs.com", "B1", RecordStatus::Active).await;

    let head = principal(&pool, "head@mine.com").await.unwrap();
    assert_eq!(head.role, Role::FranchiseHead);
    let scope = state.scope_service.resolve_scope(Some(&head)).await.unwrap();
    assert_eq!(scope, Scope::SingleFranchise { franchise_id: mine.id });

    let visible = state.student_service.list(&scope).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].student.franchise_id, mine.id);
}

#[sqlx::test]
#[ignore]
async fn staff_with_batch_sees_only_that_batch(pool: PgPool) {
    let state = state_for(pool.clone());
    let f = franchise(&state, "Wagholi", None).await;
    student(&state, f.id, "b1@x.com", "B1", RecordStatus::Active).await;
    student(&state, f.id, "b2@x.com", "B2", RecordStatus::Active).await;

    staff_member(&state, f.id, "asha@x.com", "9000000001", Some("B1")).await;

    let asha = principal(&pool, "asha@x.com").await.unwrap();
    let scope = state.scope_service.resolve_scope(Some(&asha)).await.unwrap();
    let visible = state.student_service.list(&scope).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].student.batch, "B1");
}

#[sqlx::test]
#[ignore]
async fn deleting_a_franchise_removes_its_head_but_not_the_reverse(pool: PgPool) {
    let state = state_for(pool.clone());

    // Franquia -> principal
    let doomed = franchise(&state, "Doomed", Some("head@doomed.com")).await;
    let report = state.franchise_service.delete(doomed.id).await.unwrap();
    assert_eq!(report.principal, PrincipalCleanup::Deleted);
    assert!(principal(&pool, "head@doomed.com").await.is_none());

    // Principal -> franquia continua, só perde o dono
    let survivor = franchise(&state, "Survivor", Some("head@survivor.com")).await;
    let head = principal(&pool, "head@survivor.com").await.unwrap();
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(head.id)
        .execute(&pool)
        .await
        .unwrap();
    let kept = state.franchise_service.get(&Scope::Unrestricted, survivor.id).await.unwrap();
    assert_eq!(kept.user_id, None);
}

#[sqlx::test]
#[ignore]
async fn franchise_with_students_cannot_be_deleted(pool: PgPool) {
    let state = state_for(pool.clone());
    let f = franchise(&state, "Busy", Some("head@busy.com")).await;
    student(&state, f.id, "s@busy.com", "B1", RecordStatus::Active).await;

    let err = state.franchise_service.delete(f.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    // Fase 1 falhou: nada foi apagado
    assert!(principal(&pool, "head@busy.com").await.is_some());
}

#[sqlx::test]
#[ignore]
async fn admin_stats_are_the_sum_of_franchise_stats(pool: PgPool) {
    let state = state_for(pool.clone());
    let a = franchise(&state, "A", None).await;
    let b = franchise(&state, "B", None).await;
    student(&state, a.id, "1@a.com", "B1", RecordStatus::Active).await;
    student(&state, a.id, "2@a.com", "B1", RecordStatus::Inactive).await;
    student(&state, b.id, "3@b.com", "B2", RecordStatus::Active).await;

    let total = state.student_service.stats(&Scope::Unrestricted).await.unwrap();
    let per_franchise = state.student_service.stats(&Scope::SingleFranchise { franchise_id: a.id }).await.unwrap()
        + state.student_service.stats(&Scope::SingleFranchise { franchise_id: b.id }).await.unwrap();

    assert_eq!(total, per_franchise);
    assert_eq!(total.total, 3);
    assert_eq!(total.inactive, 1);
}

#[sqlx::test]
#[ignore]
async fn concurrent_batches_in_opposite_order_both_commit(pool: PgPool) {
    let state = state_for(pool.clone());
    let f = franchise(&state, "Wagholi", None).await;
    let scope = Scope::SingleFranchise { franchise_id: f.id };

    for round in 0..20 {
        let status = if round % 2 == 0 { "Present" } else { "Late" };
        let forward: Vec<AttendanceInput> = (1..=20).map(|id| mark(None, id, "2024-05-01", status)).collect();
        let backward: Vec<AttendanceInput> = (1..=20).rev().map(|id| mark(None, id, "2024-05-01", status)).collect();

        let (a, b) = (state.attendance_service.clone(), state.attendance_service.clone());
        let (scope_a, scope_b) = (scope.clone(), scope.clone());
        let first = tokio::spawn(async move { a.upsert_attendance(&scope_a, forward).await });
        let second = tokio::spawn(async move { b.upsert_attendance(&scope_b, backward).await });

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();
        assert_eq!(first.len(), 20);
        assert_eq!(second.len(), 20);
        // Resposta na ordem enviada
        assert_eq!(second[0].staff_id, 20);
    }

    assert_eq!(attendance_rows(&pool).await, 20);
}

#[sqlx::test]
#[ignore]
async fn admin_upsert_into_missing_franchise_is_not_found(pool: PgPool) {
    let state = state_for(pool.clone());
    let f = franchise(&state, "Wagholi", None).await;

    let err = state
        .attendance_service
        .upsert_attendance(
            &Scope::Unrestricted,
            vec![mark(Some(f.id), 1, "2024-05-01", "Present"), mark(Some(f.id + 999), 2, "2024-05-01", "Present")],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound("Franchise")));
    assert_eq!(attendance_rows(&pool).await, 0);
}

#[sqlx::test]
#[ignore]
async fn franchise_head_reads_only_own_attendance(pool: PgPool) {
    let state = state_for(pool.clone());
    let mine = franchise(&state, "Mine", Some("head@mine.com")).await;
    let theirs = franchise(&state, "Theirs", None).await;
    state
        .attendance_service
        .upsert_attendance(
            &Scope::Unrestricted,
            vec![
                mark(Some(mine.id), 1, "2024-05-01", "Present"),
                mark(Some(theirs.id), 2, "2024-05-01", "Absent"),
                mark(Some(theirs.id), 3, "2024-05-20", "Present"),
            ],
        )
        .await
        .unwrap();

    let head = principal(&pool, "head@mine.com").await.unwrap();
    let scope = state.scope_service.resolve_scope(Some(&head)).await.unwrap();

    let daily = state
        .attendance_service
        .list_attendance(&scope, &AttendanceQuery { franchise: Some(theirs.id), date: Some("2024-05-01".into()) })
        .await
        .unwrap();
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].record.franchise_id, mine.id);

    let monthly = state
        .attendance_service
        .monthly_attendance(&scope, &MonthlyAttendanceQuery { franchise: Some(theirs.id), month: Some("2024-05".into()) })
        .await
        .unwrap();
    assert_eq!(monthly.len(), 1);
    assert_eq!(monthly[0].staff_id, 1);

    // Admin precisa nomear a franquia
    let admin = state
        .attendance_service
        .monthly_attendance(
            &Scope::Unrestricted,
            &MonthlyAttendanceQuery { franchise: Some(theirs.id), month: Some("2024-05".into()) },
        )
        .await
        .unwrap();
    assert_eq!(admin.len(), 2);
}

#[sqlx::test]
#[ignore]
async fn staff_listing_and_stats_stay_inside_the_franchise(pool: PgPool) {
    let state = state_for(pool.clone());
    let mine = franchise(&state, "Mine", Some("head@mine.com")).await;
    let theirs = franchise(&state, "Theirs", None).await;
    staff_member(&state, mine.id, "asha@mine.com", "9000000001", Some("B1")).await;
    staff_member(&state, theirs.id, "ravi@theirs.com", "9000000002", None).await;
    staff_member(&state, theirs.id, "meera@theirs.com", "9000000003", Some("B2")).await;

    let head = principal(&pool, "head@mine.com").await.unwrap();
    let asha = principal(&pool, "asha@mine.com").await.unwrap();

    for caller in [head, asha] {
        let scope = state.scope_service.resolve_scope(Some(&caller)).await.unwrap();

        let visible = state.staff_service.list(&scope).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].staff.franchise_id, Some(mine.id));

        let stats = state.staff_service.stats(&scope).await.unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.active, 1);
    }

    let all = state.staff_service.stats(&Scope::Unrestricted).await.unwrap();
    assert_eq!(all.total, 3);
}

#[sqlx::test]
#[ignore]
async fn padded_batch_still_narrows_to_the_trimmed_batch(pool: PgPool) {
    let state = state_for(pool.clone());
    let f = franchise(&state, "Wagholi", None).await;
    student(&state, f.id, "b1@x.com", " B1 ", RecordStatus::Active).await;
    student(&state, f.id, "b2@x.com", "B2", RecordStatus::Active).await;
    staff_member(&state, f.id, "asha@x.com", "9000000001", Some("  B1")).await;

    let asha = principal(&pool, "asha@x.com").await.unwrap();
    let scope = state.scope_service.resolve_scope(Some(&asha)).await.unwrap();
    assert_eq!(scope, Scope::FranchiseAndBatch { franchise_id: f.id, batch: Some("B1".into()) });

    let visible = state.student_service.list(&scope).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].student.batch, "B1");
    assert_eq!(state.student_service.stats(&scope).await.unwrap().total, 1);
}
