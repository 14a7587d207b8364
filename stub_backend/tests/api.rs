use serde_json::{json, Value};
use stub_backend::{spawn, StubState, ADMIN_EMAIL, ADMIN_PASSWORD};

async fn start() -> (StubState, String) {
    let state = StubState::seeded().unwrap();
    let addr = spawn(state.clone()).await.unwrap();
    (state, format!("http://{}", addr))
}

async fn token(base: &str) -> String {
    let body: Value = reqwest::Client::new()
        .post(format!("{}/AdminAuth/login", base))
        .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["data"]["access_token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let (_, base) = start().await;
    let res = reqwest::Client::new()
        .post(format!("{}/AdminAuth/login", base))
        .json(&json!({ "email": ADMIN_EMAIL, "password": "nope-nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Invalid password");
}

#[tokio::test]
async fn protected_routes_need_a_bearer_token() {
    let (state, base) = start().await;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/AdminView/patients", base)).send().await.unwrap();
    assert_eq!(res.status(), 401);

    let expired = state.issue_token(-30).unwrap();
    let res = client
        .get(format!("{}/AdminView/patients", base))
        .bearer_auth(expired)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Token expired");
    assert_eq!(state.hits("/AdminView/patients"), 2);
}

#[tokio::test]
async fn patients_filter_and_paginate() {
    let (_, base) = start().await;
    let token = token(&base).await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(format!("{}/AdminView/patients?name=&pageNumber=3&pageSize=6", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["total_pages"], 3);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);

    let body: Value = client
        .get(format!("{}/AdminView/patients?name=ALI&pageNumber=1&pageSize=6", base))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<&str> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["patient_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Alice Brown", "Alina Petrova"]);
}

#[tokio::test]
async fn approving_removes_the_request() {
    let (state, base) = start().await;
    let token = token(&base).await;
    let client = reqwest::Client::new();

    let res = client
        .patch(format!("{}/AdminAuth/dr-license-approve", base))
        .bearer_auth(&token)
        .json(&json!({ "drId": "d1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(!state.requests.contains_key("d1"));

    let res = client
        .patch(format!("{}/AdminAuth/dr-license-reject", base))
        .bearer_auth(&token)
        .json(&json!({ "drId": "d1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn queued_failure_answers_once() {
    let (state, base) = start().await;
    let token = token(&base).await;
    let client = reqwest::Client::new();
    state.fail_next("/AdminView/dr-by-id", 503, "Service unavailable");

    let url = format!("{}/AdminView/dr-by-id?drId=doc1", base);
    let first = client.get(&url).bearer_auth(&token).send().await.unwrap();
    assert_eq!(first.status(), 503);
    let second: Value = client
        .get(&url)
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["data"]["Id"], "doc1");
}
