mod common;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use car_management_be::controller;
use common::{all_cars, app_state, test_db};
use serde_json::Value;
use uuid::Uuid;

const BMW_FORM: [(&str, &str); 5] = [
    ("Name", "BMW"),
    ("Model", "M5"),
    ("Engine", "V8"),
    ("Color", "Black"),
    ("TireCount", "4"),
];

macro_rules! init_app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(app_state($store.clone())))
                .configure(controller::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn list_renders_index_view() {
    let store = test_db();
    let app = init_app!(store);

    let req = test::TestRequest::get().uri("/cars").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["view"], "Index");
    assert_eq!(body["model"], Value::Array(Vec::new()));
}

#[actix_web::test]
async fn create_form_renders_empty_form() {
    let store = test_db();
    let app = init_app!(store);

    let req = test::TestRequest::get().uri("/cars/create").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["view"], "CreateUpdate");
    assert!(body["model"]["Name"].is_null());
    assert_eq!(body["errors"], Value::Array(Vec::new()));
}

#[actix_web::test]
async fn posting_valid_form_redirects_to_list() {
    let store = test_db();
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/cars/create")
        .set_form(BMW_FORM)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/cars");

    let cars = all_cars(&store).await;
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0].name, "BMW");
}

#[actix_web::test]
async fn posting_incomplete_form_rerenders_with_values() {
    let store = test_db();
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/cars/create")
        .set_form([("Name", "BMW"), ("Model", "M5"), ("TireCount", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["view"], "CreateUpdate");
    assert_eq!(body["model"]["Name"], "BMW");
    assert_eq!(body["model"]["Model"], "M5");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|err| err["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["engine", "color", "tire_count"]);
    assert!(all_cars(&store).await.is_empty());
}

#[actix_web::test]
async fn posting_unparseable_tire_count_rerenders_form() {
    let store = test_db();
    let app = init_app!(store);

    for tire_count in ["four", "99999999999"] {
        let req = test::TestRequest::post()
            .uri("/cars/create")
            .set_form([
                ("Name", "BMW"),
                ("Model", "M5"),
                ("Engine", "V8"),
                ("Color", "Black"),
                ("TireCount", tire_count),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{tire_count}");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["view"], "CreateUpdate");
        assert_eq!(body["model"]["Name"], "BMW");
        assert_eq!(body["model"]["TireCount"], tire_count);
        assert_eq!(body["errors"][0]["field"], "tire_count");
        assert_eq!(body["errors"][0]["message"], "is invalid");
    }
    assert!(all_cars(&store).await.is_empty());
}

#[actix_web::test]
async fn posting_update_with_malformed_id_rerenders_form() {
    let store = test_db();
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/cars/update")
        .set_form([
            ("Id", "not-a-uuid"),
            ("Name", "BMW"),
            ("Model", "M3"),
            ("Engine", "I6"),
            ("Color", "Blue"),
            ("TireCount", "4"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["view"], "CreateUpdate");
    assert_eq!(body["model"]["Id"], "not-a-uuid");
    assert_eq!(body["errors"][0]["field"], "id");
}

#[actix_web::test]
async fn details_update_and_delete_over_http() {
    let store = test_db();
    let app = init_app!(store);

    let req = test::TestRequest::post()
        .uri("/cars/create")
        .set_form(BMW_FORM)
        .to_request();
    test::call_service(&app, req).await;
    let car = all_cars(&store).await.remove(0);

    let req = test::TestRequest::get()
        .uri(&format!("/cars/details/{}", car.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["view"], "Details");
    assert_eq!(body["model"]["Engine"], "V8");

    let req = test::TestRequest::get()
        .uri(&format!("/cars/update/{}", car.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["view"], "CreateUpdate");
    assert_eq!(body["model"]["Id"], car.id.to_string());

    let id = car.id.to_string();
    let req = test::TestRequest::post()
        .uri("/cars/update")
        .set_form([
            ("Id", id.as_str()),
            ("Name", "BMW"),
            ("Model", "M3"),
            ("Engine", "I6"),
            ("Color", "Blue"),
            ("TireCount", "4"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(all_cars(&store).await[0].model, "M3");

    let req = test::TestRequest::get()
        .uri(&format!("/cars/delete/{}", car.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["view"], "Delete");
    assert_eq!(body["model"]["Color"], "Blue");

    let req = test::TestRequest::post()
        .uri(&format!("/cars/delete-confirmation/{}", car.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(all_cars(&store).await.is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/cars/details/{}", car.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unknown_ids_are_not_found_except_delete_confirmation() {
    let store = test_db();
    let app = init_app!(store);
    let id = Uuid::new_v4();

    for uri in [
        format!("/cars/details/{id}"),
        format!("/cars/update/{id}"),
        format!("/cars/delete/{id}"),
    ] {
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }

    let req = test::TestRequest::post()
        .uri(&format!("/cars/delete-confirmation/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/cars");
}
