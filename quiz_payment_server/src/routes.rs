//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. I/O, database operations, etc.) should be expressed as
//! futures or asynchronous functions. Async handlers get executed concurrently by worker threads and thus don’t block
//! execution.
use std::time::Instant;

use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use quiz_payment_engine::{
    db_types::TransactionId,
    traits::{PaymentRecords, PaymentStatusQueries},
    NotificationApi,
    PaymentNotification,
    PaymentStatusApi,
    TransactionClass,
};

use crate::{
    config::ProxyConfig,
    data_objects::{HealthResponse, NotificationResponse},
    errors::ServerError,
    helpers::get_remote_ip,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().json(HealthResponse::ok())
}

//------------------------------------------   Payment notifications  ---------------------------------------------
route!(payment_notification => Post "/payment-notification" impl PaymentRecords);
/// Route handler for the payment gateway webhook.
///
/// The gateway posts a JSON notification every time a transaction changes state. The notification is authenticated
/// against the shared server key, and the payment and quiz result records are updated accordingly.
///
/// Responses:
/// * 200 with `{message, order_id, processing_time_ms}` when the notification was accepted. This includes
///   notifications with a transaction status we don't act on.
/// * 400 if a required field is missing or the signature is invalid.
/// * 404 if a successful payment refers to an order we don't know about.
/// * 500 if the quiz result could not be upgraded, or anything else went wrong.
pub async fn payment_notification<B: PaymentRecords>(
    req: HttpRequest,
    proxy: web::Data<ProxyConfig>,
    api: web::Data<NotificationApi<B>>,
    body: web::Json<PaymentNotification>,
) -> Result<HttpResponse, ServerError> {
    let started = Instant::now();
    let notification = body.into_inner();
    let peer_addr = get_remote_ip(&req, proxy.as_ref());
    info!(
        "💻️ Payment notification received from {peer_addr:?}. Order: {:?}, status: {:?}, payment type: {:?}",
        notification.order_id, notification.transaction_status, notification.payment_type
    );
    let receipt = api.process_notification(notification).await.map_err(|e| {
        warn!("💻️ Payment notification was not accepted ({}). {e}", e.outcome());
        e
    })?;
    if !receipt.is_clean() {
        warn!(
            "💻️ Payment notification for {} was accepted with {} bookkeeping error(s)",
            receipt.order_id,
            receipt.bookkeeping_errors.len()
        );
    }
    let message = match receipt.class {
        TransactionClass::Successful => "Payment completed",
        TransactionClass::Failed => "Payment marked as failed",
        TransactionClass::Pending => "Payment is pending",
        TransactionClass::Unrecognized => "Notification acknowledged",
    };
    let elapsed = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    debug!("💻️ Payment notification for {} handled in {elapsed}ms ({})", receipt.order_id, receipt.outcome());
    let response =
        NotificationResponse::new(message).with_order_id(receipt.order_id.as_str()).with_processing_time_ms(elapsed);
    Ok(HttpResponse::Ok().json(response))
}

//----------------------------------------------   Payment status  ----------------------------------------------------
route!(payment_status => Get "/payment-status/{order_id}" impl PaymentStatusQueries);
/// Route handler for the payment status endpoint.
///
/// Returns the payment for the given order id, together with its quiz result and user, or a 404 if there is no such
/// payment.
pub async fn payment_status<B: PaymentStatusQueries>(
    path: web::Path<String>,
    api: web::Data<PaymentStatusApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = TransactionId::from(path.into_inner());
    debug!("💻️ GET payment status for {order_id}");
    let status = api.payment_status(&order_id).await.map_err(|e| {
        debug!("💻️ Could not fetch payment status for {order_id}. {e}");
        e
    })?;
    match status {
        Some(view) => Ok(HttpResponse::Ok().json(view)),
        None => Err(ServerError::NoRecordFound("Payment not found".into())),
    }
}
