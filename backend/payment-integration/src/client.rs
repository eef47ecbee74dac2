//! HTTP transport implementing the gateway surface.
//!
//! Form-encoded requests with bearer auth, a per-call timeout and a
//! bounded retry for idempotent reads. Writes are never retried by
//! the transport; charge retries go through the caller-supplied
//! idempotency key.

use std::time::Duration;

use common_utils::errors::CustomResult;
use domain_types::{
    errors::{ConfigurationError, GatewayError},
    gateway_types::{
        ChargePayload, CouponPayload, CustomerPayload, GatewayCharge, GatewayCoupon,
        GatewayCustomer, GatewayPaymentMethod, GatewayPrice, GatewayProduct, GatewaySetupIntent,
        GatewaySubscription, Metadata, PaymentMethodPayload, PricePayload, ProductPayload,
        SetupIntentPayload, SubscriptionPayload,
    },
};
use interfaces::gateway::GatewayApi;
use secrecy::{ExposeSecret, SecretString};

use crate::{configs::GatewayConfig, stripe::transformers};

type FormParams = Vec<(String, String)>;

/// List envelope the search and list endpoints respond with.
#[derive(Debug, serde::Deserialize)]
struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
    secret_key: SecretString,
    call_timeout: Duration,
    read_retry_limit: u32,
}

impl HttpGateway {
    pub fn new(
        config: &GatewayConfig,
        secret_key: SecretString,
    ) -> CustomResult<Self, ConfigurationError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|error| {
                error_stack::report!(ConfigurationError::ConfigLoadFailure)
                    .attach_printable(error.to_string())
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            secret_key,
            call_timeout: Duration::from_secs(config.call_timeout_secs),
            read_retry_limit: config.read_retry_limit,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: FormParams,
        idempotency_key: Option<&str>,
    ) -> CustomResult<T, GatewayError> {
        let mut request = self
            .client
            .post(self.url(path))
            .bearer_auth(self.secret_key.expose_secret())
            .form(&params);
        if let Some(key) = idempotency_key {
            request = request.header("Idempotency-Key", key);
        }
        self.execute(request).await
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> CustomResult<T, GatewayError> {
        // Reads are safe to replay once on a network-level failure.
        let mut attempt = 0;
        loop {
            let request = self
                .client
                .get(self.url(path))
                .bearer_auth(self.secret_key.expose_secret())
                .query(query);
            match self.execute(request).await {
                Err(report)
                    if attempt < self.read_retry_limit
                        && matches!(report.current_context(), GatewayError::NetworkFailure) =>
                {
                    attempt += 1;
                    tracing::warn!(path, attempt, "gateway read failed, retrying");
                }
                outcome => return outcome,
            }
        }
    }

    async fn delete<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> CustomResult<T, GatewayError> {
        let request = self
            .client
            .delete(self.url(path))
            .bearer_auth(self.secret_key.expose_secret());
        self.execute(request).await
    }

    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> CustomResult<T, GatewayError> {
        // One deadline covers the send and the body read; a gateway
        // that stalls mid-body cannot hold the call past it.
        let outcome = tokio::time::timeout(self.call_timeout, async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        })
        .await
        .map_err(|_| error_stack::report!(GatewayError::NetworkFailure))?;
        let (status, body) = outcome.map_err(classify_transport_error)?;

        if !status.is_success() {
            let details = serde_json::from_str::<transformers::ErrorResponse>(&body)
                .unwrap_or_default()
                .error;
            return Err(error_stack::report!(transformers::classify_http_error(
                status.as_u16(),
                &details,
            )));
        }

        serde_json::from_str(&body).map_err(|error| {
            error_stack::report!(GatewayError::Unknown {
                message: format!("undecodable gateway response: {error}"),
            })
        })
    }
}

fn classify_transport_error(error: reqwest::Error) -> error_stack::Report<GatewayError> {
    if error.is_timeout() || error.is_connect() {
        error_stack::report!(GatewayError::NetworkFailure)
    } else {
        error_stack::report!(GatewayError::Unknown {
            message: error.to_string(),
        })
    }
}

fn push_metadata(params: &mut FormParams, metadata: &Metadata) {
    for (key, value) in metadata {
        params.push((format!("metadata[{key}]"), value.clone()));
    }
}

fn customer_params(payload: &CustomerPayload) -> FormParams {
    let mut params = vec![
        ("email".to_string(), payload.email.clone()),
        ("name".to_string(), payload.name.clone()),
    ];
    push_metadata(&mut params, &payload.metadata);
    params
}

fn product_params(payload: &ProductPayload) -> FormParams {
    let mut params = vec![
        ("name".to_string(), payload.name.clone()),
        ("active".to_string(), payload.active.to_string()),
    ];
    push_metadata(&mut params, &payload.metadata);
    params
}

fn price_params(payload: &PricePayload) -> FormParams {
    let mut params = vec![
        ("product".to_string(), payload.product_id.clone()),
        (
            "unit_amount".to_string(),
            payload.unit_amount.get_amount_as_i64().to_string(),
        ),
        (
            "currency".to_string(),
            payload.currency.to_string().to_lowercase(),
        ),
    ];
    if let Some(recurring) = &payload.recurring {
        params.push((
            "recurring[interval]".to_string(),
            recurring.interval.to_string(),
        ));
        params.push((
            "recurring[interval_count]".to_string(),
            recurring.interval_count.to_string(),
        ));
    }
    push_metadata(&mut params, &payload.metadata);
    params
}

fn coupon_params(payload: &CouponPayload) -> FormParams {
    let mut params = vec![
        ("name".to_string(), payload.name.clone()),
        ("percent_off".to_string(), payload.percent_off.to_string()),
        ("duration".to_string(), payload.duration.to_string()),
    ];
    if let Some(months) = payload.duration_in_months {
        params.push(("duration_in_months".to_string(), months.to_string()));
    }
    push_metadata(&mut params, &payload.metadata);
    params
}

fn subscription_params(payload: &SubscriptionPayload) -> FormParams {
    let mut params = vec![
        ("customer".to_string(), payload.customer_id.clone()),
        ("items[0][price]".to_string(), payload.price_id.clone()),
    ];
    if let Some(days) = payload.trial_period_days {
        params.push(("trial_period_days".to_string(), days.to_string()));
    }
    if let Some(coupon) = &payload.coupon_id {
        params.push(("coupon".to_string(), coupon.clone()));
    }
    push_metadata(&mut params, &payload.metadata);
    params
}

fn charge_params(payload: &ChargePayload) -> FormParams {
    let mut params = vec![
        (
            "amount".to_string(),
            payload.amount.get_amount_as_i64().to_string(),
        ),
        (
            "currency".to_string(),
            payload.currency.to_string().to_lowercase(),
        ),
        ("source".to_string(), payload.source.clone()),
        ("description".to_string(), payload.description.clone()),
        ("capture".to_string(), payload.capture.to_string()),
    ];
    if let Some(customer) = &payload.customer_id {
        params.push(("customer".to_string(), customer.clone()));
    }
    if let Some(fee) = payload.application_fee_amount {
        params.push((
            "application_fee_amount".to_string(),
            fee.get_amount_as_i64().to_string(),
        ));
    }
    push_metadata(&mut params, &payload.metadata);
    params
}

#[async_trait::async_trait]
impl GatewayApi for HttpGateway {
    async fn create_customer(
        &self,
        payload: CustomerPayload,
    ) -> CustomResult<GatewayCustomer, GatewayError> {
        self.post("customers", customer_params(&payload), None).await
    }

    async fn update_customer(
        &self,
        id: &str,
        payload: CustomerPayload,
    ) -> CustomResult<GatewayCustomer, GatewayError> {
        self.post(&format!("customers/{id}"), customer_params(&payload), None)
            .await
    }

    async fn search_customers(
        &self,
        query: &str,
    ) -> CustomResult<Vec<GatewayCustomer>, GatewayError> {
        let list: ListEnvelope<GatewayCustomer> = self
            .get("customers/search", &[("query", query)])
            .await?;
        Ok(list.data)
    }

    async fn create_product(
        &self,
        payload: ProductPayload,
    ) -> CustomResult<GatewayProduct, GatewayError> {
        self.post("products", product_params(&payload), None).await
    }

    async fn update_product(
        &self,
        id: &str,
        payload: ProductPayload,
    ) -> CustomResult<GatewayProduct, GatewayError> {
        self.post(&format!("products/{id}"), product_params(&payload), None)
            .await
    }

    async fn search_products(
        &self,
        query: &str,
    ) -> CustomResult<Vec<GatewayProduct>, GatewayError> {
        let list: ListEnvelope<GatewayProduct> =
            self.get("products/search", &[("query", query)]).await?;
        Ok(list.data)
    }

    async fn create_price(
        &self,
        payload: PricePayload,
    ) -> CustomResult<GatewayPrice, GatewayError> {
        self.post("prices", price_params(&payload), None).await
    }

    async fn search_prices(&self, query: &str) -> CustomResult<Vec<GatewayPrice>, GatewayError> {
        let list: ListEnvelope<GatewayPrice> =
            self.get("prices/search", &[("query", query)]).await?;
        Ok(list.data)
    }

    async fn create_coupon(
        &self,
        payload: CouponPayload,
    ) -> CustomResult<GatewayCoupon, GatewayError> {
        self.post("coupons", coupon_params(&payload), None).await
    }

    async fn update_coupon(
        &self,
        id: &str,
        payload: CouponPayload,
    ) -> CustomResult<GatewayCoupon, GatewayError> {
        self.post(&format!("coupons/{id}"), coupon_params(&payload), None)
            .await
    }

    async fn delete_coupon(&self, id: &str) -> CustomResult<(), GatewayError> {
        let _: serde_json::Value = self.delete(&format!("coupons/{id}")).await?;
        Ok(())
    }

    async fn list_coupons(&self) -> CustomResult<Vec<GatewayCoupon>, GatewayError> {
        let list: ListEnvelope<GatewayCoupon> = self.get("coupons", &[]).await?;
        Ok(list.data)
    }

    async fn create_payment_method(
        &self,
        payload: PaymentMethodPayload,
    ) -> CustomResult<GatewayPaymentMethod, GatewayError> {
        let mut params = vec![("token".to_string(), payload.token.clone())];
        if let Some(customer) = &payload.customer_id {
            params.push(("customer".to_string(), customer.clone()));
        }
        self.post("payment_methods", params, None).await
    }

    async fn create_setup_intent(
        &self,
        payload: SetupIntentPayload,
    ) -> CustomResult<GatewaySetupIntent, GatewayError> {
        let params = vec![
            ("customer".to_string(), payload.customer_id.clone()),
            (
                "payment_method".to_string(),
                payload.payment_method_id.clone(),
            ),
            ("confirm".to_string(), payload.confirm.to_string()),
        ];
        self.post("setup_intents", params, None).await
    }

    async fn create_subscription(
        &self,
        payload: SubscriptionPayload,
    ) -> CustomResult<GatewaySubscription, GatewayError> {
        self.post("subscriptions", subscription_params(&payload), None)
            .await
    }

    async fn cancel_subscription(
        &self,
        id: &str,
    ) -> CustomResult<GatewaySubscription, GatewayError> {
        self.delete(&format!("subscriptions/{id}")).await
    }

    async fn create_charge(
        &self,
        payload: ChargePayload,
    ) -> CustomResult<GatewayCharge, GatewayError> {
        let idempotency_key = payload.idempotency_key.clone();
        self.post("charges", charge_params(&payload), idempotency_key.as_deref())
            .await
    }
}
