mod common;

use std::time::Duration;

use admin_client::keys;
use admin_client::models::PaymentStatus;
use admin_client::notify::Level;
use admin_client::views::patients::NO_PATIENTS;
use admin_client::views::{
    Dashboard, DashboardView, DetailView, DoctorDetail, DoctorsList, ListView, PatientDetail, PatientsList,
    VerificationRequests,
};
use common::{drain, signed_in};

#[tokio::test]
async fn concurrent_views_of_one_key_share_a_request() {
    let h = signed_in().await;
    h.backend.set_delay("/AdminView/patients", Duration::from_millis(200));

    let first = PatientsList::new(&h.ctx);
    let second = PatientsList::new(&h.ctx);
    let (a, b) = tokio::join!(first.load(), second.load());

    assert_eq!(h.backend.hits("/AdminView/patients"), 1);
    assert_eq!(a, b);
    let ListView::Ready(page) = a else {
        panic!("expected rows");
    };
    assert_eq!(page.items.len(), 6);
    assert_eq!(page.total_pages, 3);
    assert!(page.show_pagination);
}

#[tokio::test]
async fn later_pages_and_empty_searches() {
    let h = signed_in().await;
    let mut list = PatientsList::new(&h.ctx);

    list.set_page(2);
    let ListView::Ready(page) = list.load().await else {
        panic!("expected rows");
    };
    assert_eq!(page.page, 2);
    assert_eq!(page.total_pages, 3);
    assert!(page.show_pagination);
    assert_eq!(page.items[0].id, "p7");

    list.search_mut().type_text("zz-no-match");
    assert!(list.search_mut().settle().await);
    assert_eq!(list.load().await, ListView::Empty(NO_PATIENTS));
}

#[tokio::test]
async fn applying_a_search_goes_back_to_page_one() {
    let h = signed_in().await;
    let mut list = DoctorsList::new(&h.ctx);
    list.set_page(2);
    list.load().await;

    list.search_mut().type_text("dr. e");
    list.search_mut().settle().await;
    assert_eq!(list.search().page(), 1);

    let ListView::Ready(page) = list.load().await else {
        panic!("expected rows");
    };
    let names: Vec<_> = page.items.iter().filter_map(|d| d.name.clone()).collect();
    assert_eq!(names, ["Dr. Emre Kaplan", "Dr. Ece Gunes"]);
    assert!(!page.show_pagination);
}

#[tokio::test]
async fn blocking_a_patient_shows_in_detail_and_list() {
    let h = signed_in().await;
    let mut inbox = h.ctx.notifier.subscribe();
    let detail = PatientDetail::new(&h.ctx, "p1");
    let list = PatientsList::new(&h.ctx);

    let DetailView::Ready(before) = detail.load().await else {
        panic!("expected patient");
    };
    assert!(!before.is_blocked);
    assert_eq!(detail.toggle_button().label, "Block");
    list.load().await;

    let message = detail.toggle_block().await.unwrap();
    assert_eq!(message.0, "Patient blocked successfully");
    assert!(h.ctx.cache.is_stale(&keys::patient("p1")));
    assert!(h.ctx.cache.is_stale(&keys::patients(1, "")));

    let DetailView::Ready(after) = detail.load().await else {
        panic!("expected patient");
    };
    assert!(after.is_blocked);
    assert_eq!(detail.toggle_button().label, "Unblock");

    let ListView::Ready(page) = list.load().await else {
        panic!("expected rows");
    };
    assert!(page.items.iter().any(|p| p.id == "p1" && p.is_blocked));
    assert_eq!(h.backend.hits("/AdminView/patients"), 2);

    let notes = drain(&mut inbox);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, Level::Success);
    assert_eq!(notes[0].message, "Patient blocked successfully");
}

#[tokio::test]
async fn mounted_list_refreshes_after_a_detail_toggle() {
    let h = signed_in().await;
    let list = PatientsList::new(&h.ctx);
    let detail = PatientDetail::new(&h.ctx, "p2");
    let ListView::Ready(page) = list.load().await else {
        panic!("expected rows");
    };
    assert!(page.items.iter().any(|p| p.id == "p2" && !p.is_blocked));
    detail.load().await;
    let mut updates = list.updates();

    detail.toggle_block().await.unwrap();
    tokio::time::timeout(Duration::from_secs(5), updates.changed())
        .await
        .unwrap()
        .unwrap();

    let ListView::Ready(page) = list.render() else {
        panic!("expected rows");
    };
    assert!(page.items.iter().any(|p| p.id == "p2" && p.is_blocked));
    assert_eq!(h.backend.hits("/AdminView/patients"), 2);
}

#[tokio::test]
async fn toggle_failure_without_message_uses_the_patient_text() {
    let h = signed_in().await;
    let mut inbox = h.ctx.notifier.subscribe();
    let detail = PatientDetail::new(&h.ctx, "p3");
    detail.load().await;

    h.backend.fail_next("/AdminView/patient/block-unblock", 500, "");
    let err = detail.toggle_block().await.unwrap_err();
    assert_eq!(err.status(), Some(500));

    let notes = drain(&mut inbox);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, Level::Error);
    assert_eq!(notes[0].message, "Failed to update patient status");
}

#[tokio::test]
async fn failed_toggle_keeps_cached_doctor() {
    let h = signed_in().await;
    let mut inbox = h.ctx.notifier.subscribe();
    let detail = DoctorDetail::new(&h.ctx, "doc4");

    let DetailView::Ready(before) = detail.load().await else {
        panic!("expected doctor");
    };
    assert!(before.is_blocked);

    h.backend.fail_next("/AdminView/dr-block/unblock", 500, "Database error");
    let err = detail.toggle_block().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(!detail.toggle_button().disabled);

    assert!(!h.ctx.cache.is_stale(&keys::doctor("doc4")));
    assert_eq!(detail.load().await, DetailView::Ready(before));
    assert_eq!(h.backend.hits("/AdminView/dr-by-id"), 1);

    let notes = drain(&mut inbox);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, Level::Error);
    assert_eq!(notes[0].message, "Database error");
}

#[tokio::test]
async fn missing_records_render_the_server_message() {
    let h = signed_in().await;
    let detail = PatientDetail::new(&h.ctx, "p404");
    assert_eq!(detail.load().await, DetailView::Error("Patient not found".into()));
}

#[tokio::test]
async fn doctor_detail_reads_capitalised_id() {
    let h = signed_in().await;
    let DetailView::Ready(doctor) = DoctorDetail::new(&h.ctx, "doc1").load().await else {
        panic!("expected doctor");
    };
    assert_eq!(doctor.id, "doc1");
    assert_eq!(doctor.experience_years, Some(2));
    assert_eq!(doctor.specialization.as_deref(), Some("Cardiology"));
}

#[tokio::test]
async fn approving_a_request_removes_it() {
    let h = signed_in().await;
    let mut inbox = h.ctx.notifier.subscribe();
    let mut requests = VerificationRequests::new(&h.ctx);

    let ListView::Ready(page) = requests.load().await else {
        panic!("expected requests");
    };
    assert_eq!(page.items.len(), 5);
    assert!(page.show_pagination);
    let first = page.items[0].clone();
    assert_eq!(first.id, "d1");

    requests.open(first);
    assert!(requests.is_modal_open());
    requests.approve("d1").await.unwrap();
    assert!(!requests.is_modal_open());
    assert!(!requests.is_approving());

    let ListView::Ready(page) = requests.load().await else {
        panic!("expected requests");
    };
    assert!(page.items.iter().all(|r| r.id != "d1"));

    let notes = drain(&mut inbox);
    assert_eq!(notes[0].message, "License of Dr. Kerem Bal approved");
}

#[tokio::test]
async fn rejecting_an_unknown_request_keeps_the_modal_open() {
    let h = signed_in().await;
    let mut requests = VerificationRequests::new(&h.ctx);
    let ListView::Ready(page) = requests.load().await else {
        panic!("expected requests");
    };
    requests.open(page.items[1].clone());

    let err = requests.reject("d99").await.unwrap_err();
    assert_eq!(err.to_string(), "Verification request not found");
    assert!(requests.is_modal_open());
}

#[tokio::test]
async fn dashboard_totals_and_payment_pages() {
    let h = signed_in().await;
    let mut dashboard = Dashboard::new(&h.ctx);

    let DashboardView::Ready(page) = dashboard.load().await else {
        panic!("expected dashboard");
    };
    assert_eq!(page.payments().len(), 6);
    assert!(page.show_pagination);
    assert_eq!(page.summary.payment_pending, 2);
    assert_eq!(page.summary.payment_failed, 2);

    let selected = dashboard.select_payment("pay3").cloned().unwrap();
    assert_eq!(selected.status, PaymentStatus::Pending);
    dashboard.close_payment();
    assert!(dashboard.selected_payment().is_none());

    dashboard.set_page(2);
    let DashboardView::Ready(page) = dashboard.load().await else {
        panic!("expected dashboard");
    };
    assert_eq!(page.page, 2);
    assert_eq!(page.payments().len(), 3);
}
