use crate::error::AppError;
use crate::ledger::ExpenseLedger;
use crate::schemas::{ExpenseDraft, ExpenseId, Person};
use actix_web::{delete, get, post, put, web, HttpResponse};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_people)
        .service(list_expenses)
        .service(add_expense)
        .service(update_expense)
        .service(delete_expense)
        .service(get_balances)
        .service(get_transactions)
        .service(get_settlement);
}

// Malformed ids can't match any expense
fn parse_id(id: web::Path<String>) -> Result<ExpenseId, AppError> {
    let id = id.into_inner();
    id.parse().map_err(|_| AppError::NotFound(id))
}

#[get("/people")]
async fn list_people() -> HttpResponse {
    HttpResponse::Ok().json(Person::ALL)
}

#[get("/expenses")]
async fn list_expenses(ledger: web::Data<ExpenseLedger>) -> HttpResponse {
    HttpResponse::Ok().json(ledger.expenses().await)
}

#[post("/expenses")]
async fn add_expense(
    ledger: web::Data<ExpenseLedger>,
    draft: web::Json<ExpenseDraft>,
) -> Result<HttpResponse, AppError> {
    let expense = ledger.add_expense(draft.into_inner()).await?;
    Ok(HttpResponse::Created().json(expense))
}

#[put("/expenses/{id}")]
async fn update_expense(
    ledger: web::Data<ExpenseLedger>,
    id: web::Path<String>,
    draft: web::Json<ExpenseDraft>,
) -> Result<HttpResponse, AppError> {
    let expense = ledger
        .update_expense(parse_id(id)?, draft.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(expense))
}

#[delete("/expenses/{id}")]
async fn delete_expense(
    ledger: web::Data<ExpenseLedger>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let expense = ledger.delete_expense(parse_id(id)?).await?;
    Ok(HttpResponse::Ok().json(expense))
}

/// Largest credit first, the way balances are shown to people.
#[get("/balances")]
async fn get_balances(ledger: web::Data<ExpenseLedger>) -> HttpResponse {
    let mut balances = ledger.settlement().await.balances;
    balances.sort_by(|a, b| b.balance.total_cmp(&a.balance));
    HttpResponse::Ok().json(balances)
}

#[get("/transactions")]
async fn get_transactions(ledger: web::Data<ExpenseLedger>) -> HttpResponse {
    HttpResponse::Ok().json(ledger.settlement().await.transactions)
}

#[get("/settlement")]
async fn get_settlement(ledger: web::Data<ExpenseLedger>) -> HttpResponse {
    HttpResponse::Ok().json(ledger.settlement().await)
}
