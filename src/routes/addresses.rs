use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::{NewAddress, UserProfile};
use crate::store::DynUserStore;
use crate::validators::{required, valid_phone};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressForm {
    pub street: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// POST /userAddress/createAddress (authenticated)
///
/// The address is owned by the caller and shows up in their profile.
///
/// # Errors
/// - 400: a field is missing/blank or the phone is not ten digits
pub async fn create_address(
    user: web::ReqData<UserProfile>,
    form: web::Json<AddressForm>,
    users: web::Data<DynUserStore>,
) -> Result<HttpResponse, AppError> {
    let address = NewAddress {
        street: required("street", form.street.as_deref())?,
        phone: valid_phone(form.phone.as_deref())?,
        city: required("city", form.city.as_deref())?,
        state: required("state", form.state.as_deref())?,
        postal_code: required("postalCode", form.postal_code.as_deref())?,
        country: required("country", form.country.as_deref())?,
        user_id: user.id,
    };

    let created_address = users.insert_address(address).await?;
    tracing::info!(user_id = %user.id, address_id = %created_address.id, "Address created");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Address created successfully",
        "createdAddress": created_address,
    })))
}
