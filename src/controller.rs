use std::sync::Arc;

use actix_web::body::BoxBody;
use actix_web::http::header;
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use uuid::Uuid;

use crate::error::{AppError, ServiceError};
use crate::service::CarService;
use crate::store::CarStore;
use crate::view_models::{
    CarsCreateUpdateViewModel, CarsDeleteViewModel, CarsDetailsViewModel, CarsIndexViewModel,
    CarsView, FieldError,
};

pub const INDEX_PATH: &str = "/cars";

pub struct AppState {
    pub store: Arc<dyn CarStore>,
}

#[derive(Debug, PartialEq)]
pub enum ActionResult {
    View(CarsView),
    RedirectToIndex,
    NotFound,
}

impl Responder for ActionResult {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        match self {
            ActionResult::View(view) => {
                log::debug!("Rendering {} view", view.name());
                HttpResponse::Ok().json(view)
            }
            ActionResult::RedirectToIndex => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, INDEX_PATH))
                .finish(),
            ActionResult::NotFound => HttpResponse::NotFound().body("Car not found"),
        }
    }
}

fn form(model: CarsCreateUpdateViewModel, errors: Vec<FieldError>) -> ActionResult {
    ActionResult::View(CarsView::CreateUpdate { model, errors })
}

async fn service(store: &dyn CarStore) -> Result<CarService, AppError> {
    Ok(CarService::new(store.begin().await?))
}

pub async fn index(store: &dyn CarStore) -> Result<ActionResult, AppError> {
    let mut ctx = store.begin().await?;
    let cars = ctx.find_all().await?;

    Ok(ActionResult::View(CarsView::Index {
        model: cars.iter().map(CarsIndexViewModel::from).collect(),
    }))
}

pub fn create_form() -> ActionResult {
    form(CarsCreateUpdateViewModel::default(), Vec::new())
}

pub async fn create(
    store: &dyn CarStore,
    vm: CarsCreateUpdateViewModel,
) -> Result<ActionResult, AppError> {
    let errors = vm.check();
    if !errors.is_empty() {
        return Ok(form(vm, errors));
    }

    match service(store).await?.create(vm.to_dto()).await {
        Ok(_) => Ok(ActionResult::RedirectToIndex),
        Err(ServiceError::Validation { field, reason }) => {
            Ok(form(vm, vec![FieldError::new(field, reason)]))
        }
        Err(ServiceError::Store(err)) => Err(err.into()),
    }
}

pub async fn details(store: &dyn CarStore, id: Uuid) -> Result<ActionResult, AppError> {
    match service(store).await?.detail(id).await? {
        Some(car) => Ok(ActionResult::View(CarsView::Details {
            model: CarsDetailsViewModel::from(&car),
        })),
        None => Ok(ActionResult::NotFound),
    }
}

pub async fn update_form(store: &dyn CarStore, id: Uuid) -> Result<ActionResult, AppError> {
    match service(store).await?.detail(id).await? {
        Some(car) => Ok(form(CarsCreateUpdateViewModel::from(&car), Vec::new())),
        None => Ok(ActionResult::NotFound),
    }
}

pub async fn update(
    store: &dyn CarStore,
    vm: CarsCreateUpdateViewModel,
) -> Result<ActionResult, AppError> {
    let errors = vm.check_update();
    if !errors.is_empty() {
        return Ok(form(vm, errors));
    }

    match service(store).await?.update(vm.to_dto()).await {
        Ok(Some(_)) => Ok(ActionResult::RedirectToIndex),
        Ok(None) => Ok(ActionResult::NotFound),
        Err(ServiceError::Validation { field, reason }) => {
            Ok(form(vm, vec![FieldError::new(field, reason)]))
        }
        Err(ServiceError::Store(err)) => Err(err.into()),
    }
}

pub async fn delete_form(store: &dyn CarStore, id: Uuid) -> Result<ActionResult, AppError> {
    match service(store).await?.detail(id).await? {
        Some(car) => Ok(ActionResult::View(CarsView::Delete {
            model: CarsDeleteViewModel::from(&car),
        })),
        None => Ok(ActionResult::NotFound),
    }
}

/// Redirects to the list whether or not the car still existed.
pub async fn delete_confirmation(store: &dyn CarStore, id: Uuid) -> Result<ActionResult, AppError> {
    service(store).await?.delete(id).await?;
    Ok(ActionResult::RedirectToIndex)
}

#[get("/cars")]
async fn get_cars(data: web::Data<AppState>) -> Result<ActionResult, AppError> {
    index(data.store.as_ref()).await
}

#[get("/cars/create")]
async fn get_create() -> impl Responder {
    create_form()
}

#[post("/cars/create")]
async fn post_create(
    data: web::Data<AppState>,
    vm: web::Form<CarsCreateUpdateViewModel>,
) -> Result<ActionResult, AppError> {
    create(data.store.as_ref(), vm.into_inner()).await
}

#[get("/cars/details/{id}")]
async fn get_details(
    data: web::Data<AppState>,
    path: web::Path<(Uuid,)>,
) -> Result<ActionResult, AppError> {
    details(data.store.as_ref(), path.into_inner().0).await
}

#[get("/cars/update/{id}")]
async fn get_update(
    data: web::Data<AppState>,
    path: web::Path<(Uuid,)>,
) -> Result<ActionResult, AppError> {
    update_form(data.store.as_ref(), path.into_inner().0).await
}

#[post("/cars/update")]
async fn post_update(
    data: web::Data<AppState>,
    vm: web::Form<CarsCreateUpdateViewModel>,
) -> Result<ActionResult, AppError> {
    update(data.store.as_ref(), vm.into_inner()).await
}

#[get("/cars/delete/{id}")]
async fn get_delete(
    data: web::Data<AppState>,
    path: web::Path<(Uuid,)>,
) -> Result<ActionResult, AppError> {
    delete_form(data.store.as_ref(), path.into_inner().0).await
}

#[post("/cars/delete-confirmation/{id}")]
async fn post_delete_confirmation(
    data: web::Data<AppState>,
    path: web::Path<(Uuid,)>,
) -> Result<ActionResult, AppError> {
    delete_confirmation(data.store.as_ref(), path.into_inner().0).await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_cars)
        .service(get_create)
        .service(post_create)
        .service(get_details)
        .service(get_update)
        .service(post_update)
        .service(get_delete)
        .service(post_delete_confirmation);
}
