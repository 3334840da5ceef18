use crate::domain::models::{booking::Booking, event::Event, user::User, venue::Venue};
use crate::domain::ports::NotificationService;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::error;

pub struct HttpNotificationService {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpNotificationService {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct ConfirmationPayload {
    template: String,
    recipient_name: String,
    recipient_email: Option<String>,
    recipient_phone: Option<String>,
    booking_id: String,
    number_of_people: i64,
    total_amount: i64,
    qr_code: String,
    event_name: String,
    event_date: String,
    start_time: String,
    venue_name: String,
    venue_address: String,
}

#[async_trait]
impl NotificationService for HttpNotificationService {
    async fn send_booking_confirmation(
        &self,
        user: &User,
        booking: &Booking,
        event: &Event,
        venue: &Venue,
    ) -> Result<(), AppError> {
        let payload = ConfirmationPayload {
            template: "booking_confirmation".to_string(),
            recipient_name: user.name.clone().unwrap_or_default(),
            recipient_email: user.email.clone(),
            recipient_phone: user.phone.clone(),
            booking_id: booking.id.clone(),
            number_of_people: booking.number_of_people,
            total_amount: booking.total_amount,
            qr_code: booking.qr_code.clone(),
            event_name: event.name.clone(),
            event_date: event.event_date.to_string(),
            start_time: event.start_time.clone(),
            venue_name: venue.name.clone(),
            venue_address: venue.address.clone(),
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Notification service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Notification service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        Ok(())
    }
}
