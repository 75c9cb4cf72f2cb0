//! HTTP-level integration tests for the song endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_song, delete, get, patch_json, post_json};
use serde_json::json;
use sqlx::PgPool;

const THREE_COUPLETS: &str =
    "Ooh baby, don't you know I suffer?\nOoh baby, can you hear me moan?\n\n\
     You caught me under false pretenses\nHow long before you let me go?\n\n\
     Ooh, you set my soul alight";

async fn set_details(pool: &PgPool, id: i64, details: serde_json::Value) {
    let app = common::build_test_app(pool.clone());
    let response = patch_json(
        app,
        &format!("/api/v1/songs/{id}"),
        json!({ "song_details": details }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Create / info / delete lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_info_delete_lifecycle(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/songs",
        json!({"group": "Group12", "song": "Song12"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert!(id > 0);
    assert_eq!(created["data"]["group"], "Group12");
    assert_eq!(created["data"]["song"], "Song12");

    let app = common::build_test_app(pool.clone());
    let response = get(app, "/api/v1/info?group=Group12&song=Song12").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["song_id"], id);
    assert_eq!(json["data"]["group"], "Group12");

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/v1/songs/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["deleted"], 1);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/info?group=Group12&song=Song12").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_song_returns_409(pool: PgPool) {
    create_song(&pool, "Muse", "Hysteria").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/songs",
        json!({"group": "Muse", "song": "Hysteria"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_without_song_name_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/v1/songs", json!({"group": "Muse"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_PARAMETER");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_json_body_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::send(
        app,
        axum::http::Method::POST,
        "/api/v1/songs",
        Some(json!(["not", "an", "object"])),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_PARAMETER");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn info_requires_both_params(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/info?group=Muse").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_PARAMETER");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_unknown_song_returns_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = delete(app, "/api/v1/songs/999999").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_positive_path_id_is_rejected(pool: PgPool) {
    for uri in ["/api/v1/songs/0", "/api/v1/songs/-4", "/api/v1/songs/abc"] {
        let app = common::build_test_app(pool.clone());
        let response = delete(app, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["code"], "INVALID_PARAMETER");
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_song_and_details(pool: PgPool) {
    let id = create_song(&pool, "Muse", "Supermassive Black Hole").await;

    let app = common::build_test_app(pool.clone());
    let response = patch_json(
        app,
        &format!("/api/v1/songs/{id}"),
        json!({
            "song": {"group": "MUSE"},
            "song_details": {
                "release_date": "16.07.2006",
                "link": "https://www.youtube.com/watch?v=Xsp3_a-PMTw"
            }
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["song_id"], id);
    assert_eq!(json["data"]["updated"], 2);

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/info?group=MUSE&song=Supermassive%20Black%20Hole").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["release_date"], "16.07.2006");
    assert_eq!(
        json["data"]["link"],
        "https://www.youtube.com/watch?v=Xsp3_a-PMTw"
    );
    assert!(json["data"].get("text").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_update_is_reported_as_not_found(pool: PgPool) {
    let id = create_song(&pool, "Muse", "Uprising").await;

    let app = common::build_test_app(pool);
    let response = patch_json(app, &format!("/api/v1/songs/{id}"), json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_with_bad_release_date_is_rejected(pool: PgPool) {
    let id = create_song(&pool, "Muse", "Madness").await;

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/songs/{id}"),
        json!({"song_details": {"release_date": "2012-08-20"}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_PARAMETER");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rename_into_existing_song_conflicts(pool: PgPool) {
    create_song(&pool, "Muse", "Starlight").await;
    let id = create_song(&pool, "Muse", "Starlight 2").await;

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/songs/{id}"),
        json!({"song": {"song": "Starlight"}}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Lyrics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn lyrics_page_returns_second_couplet(pool: PgPool) {
    let id = create_song(&pool, "Muse", "Hysteria").await;
    set_details(&pool, id, json!({"text": THREE_COUPLETS})).await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/songs/{id}/lyrics?limit=1&offset=1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["song_id"], id);
    assert_eq!(
        json["data"]["couplets"],
        json!(["You caught me under false pretenses\nHow long before you let me go?"])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lyrics_of_song_without_text_is_empty(pool: PgPool) {
    let id = create_song(&pool, "Muse", "Instrumental").await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/songs/{id}/lyrics")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["couplets"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lyrics_of_unknown_song_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/songs/424242/lyrics").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn lyrics_reject_invalid_pagination(pool: PgPool) {
    let id = create_song(&pool, "Muse", "Invincible").await;

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/v1/songs/{id}/lyrics?offset=-1")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_PARAMETER");
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_groups(pool: PgPool) {
    create_song(&pool, "Noize MC", "Вселенная бесконечна").await;
    create_song(&pool, "мы", "Возможно").await;
    create_song(&pool, "Muse", "Resistance").await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/songs?filter=groups=Noize_MC+%D0%BC%D1%8B").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let mut groups: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["group"].as_str().unwrap())
        .collect();
    groups.sort_unstable();
    assert_eq!(groups, vec!["Noize MC", "мы"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_projects_requested_fields(pool: PgPool) {
    let id = create_song(&pool, "Muse", "Knights of Cydonia").await;
    set_details(&pool, id, json!({"release_date": "26.06.2006"})).await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/songs?fields=song_id+release_date").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(
        json["data"],
        json!([{"song_id": id, "release_date": "26.06.2006"}])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_paginates_in_id_order(pool: PgPool) {
    let mut ids = Vec::new();
    for n in 0..4 {
        ids.push(create_song(&pool, "Muse", &format!("Track {n}")).await);
    }

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/songs?fields=song_id&limit=2&offset=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json["data"],
        json!([{"song_id": ids[2]}, {"song_id": ids[3]}])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_release_date_range(pool: PgPool) {
    let early = create_song(&pool, "Muse", "Early").await;
    let inside = create_song(&pool, "Muse", "Inside").await;
    set_details(&pool, early, json!({"release_date": "01.01.2001"})).await;
    set_details(&pool, inside, json!({"release_date": "08.02.2024"})).await;

    let app = common::build_test_app(pool);
    let response = get(
        app,
        "/api/v1/songs?fields=song_id&filter=release_date=01.02.2022-08.02.2024",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], json!([{"song_id": inside}]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_rejects_bad_params(pool: PgPool) {
    let cases = [
        ("/api/v1/songs?limit=0", "INVALID_PARAMETER"),
        ("/api/v1/songs?offset=-1", "INVALID_PARAMETER"),
        ("/api/v1/songs?fields=song+album", "INVALID_PARAMETER"),
        ("/api/v1/songs?filter=album=x", "INVALID_FILTER"),
        ("/api/v1/songs?filter=song_id=gt", "INVALID_FILTER"),
        ("/api/v1/songs?filter=release_date=2024", "INVALID_FILTER"),
    ];
    for (uri, code) in cases {
        let app = common::build_test_app(pool.clone());
        let response = get(app, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await["code"], code, "{uri}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_clamps_large_limit(pool: PgPool) {
    create_song(&pool, "Muse", "Undisclosed Desires").await;

    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/songs?limit=5000").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}
