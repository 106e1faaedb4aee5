// src/models/bookings.rs
//
// Ocupações com janela de tempo: hospedagens (quartos) e reservas
// esportivas. As duas compartilham a forma de IntervalBooking: recurso,
// janela semiaberta [início, fim), quantidade, status, total e valor pago.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "stay_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StayStatus {
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl StayStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::CheckedOut | Self::Cancelled)
    }

    /// CONFIRMED -> CHECKED_IN -> CHECKED_OUT; CONFIRMED|CHECKED_IN -> CANCELLED.
    /// Nada sai de CHECKED_OUT ou CANCELLED.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Confirmed, Self::CheckedIn)
                | (Self::CheckedIn, Self::CheckedOut)
                | (Self::Confirmed, Self::Cancelled)
                | (Self::CheckedIn, Self::Cancelled)
        )
    }

    /// Uma hospedagem só deixa de bloquear o quarto quando cancelada.
    /// CHECKED_OUT continua ocupando a janela histórica dela.
    pub fn blocks_room(self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "reservation_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// PENDING -> CONFIRMED -> IN_PROGRESS -> COMPLETED;
    /// qualquer não terminal -> CANCELLED.
    pub fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Pending, Self::Confirmed) => true,
            (Self::Confirmed, Self::InProgress) => true,
            (Self::InProgress, Self::Completed) => true,
            (from, Self::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    /// CANCELLED e COMPLETED não contam para a capacidade da instalação.
    pub fn consumes_capacity(self) -> bool {
        !self.is_terminal()
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stay {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub room_id: Uuid,
    pub client_id: Uuid,
    // Janela semiaberta: check_out é exclusivo, então hospedagens
    // encostadas (saída às 11h, entrada às 11h) não conflitam.
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub status: StayStatus,
    pub actual_check_in: Option<DateTime<Utc>>,
    pub actual_check_out: Option<DateTime<Utc>>,
    #[schema(example = "1000.00")]
    pub total: Decimal,
    #[schema(example = "0.00")]
    pub paid_amount: Decimal,
    #[schema(ignore)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SportReservation {
    pub id: Uuid,
    #[schema(ignore)]
    pub tenant_id: Uuid,
    pub facility_id: Uuid,
    pub client_id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    // Vagas consumidas dentro da capacidade da instalação.
    #[schema(example = 2)]
    pub quantity: i32,
    pub status: ReservationStatus,
    #[schema(example = "160.00")]
    pub total: Decimal,
    #[schema(example = "0.00")]
    pub paid_amount: Decimal,
    #[schema(ignore)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hospedagem_segue_o_fluxo_feliz() {
        assert!(StayStatus::Confirmed.can_transition_to(StayStatus::CheckedIn));
        assert!(StayStatus::CheckedIn.can_transition_to(StayStatus::CheckedOut));
    }

    #[test]
    fn hospedagem_nao_sai_de_estado_terminal() {
        assert!(!StayStatus::CheckedOut.can_transition_to(StayStatus::CheckedIn));
        assert!(!StayStatus::Cancelled.can_transition_to(StayStatus::Confirmed));
        assert!(!StayStatus::Cancelled.can_transition_to(StayStatus::Cancelled));
    }

    #[test]
    fn hospedagem_cancela_de_confirmada_ou_em_casa() {
        assert!(StayStatus::Confirmed.can_transition_to(StayStatus::Cancelled));
        assert!(StayStatus::CheckedIn.can_transition_to(StayStatus::Cancelled));
        assert!(!StayStatus::CheckedOut.can_transition_to(StayStatus::Cancelled));
    }

    #[test]
    fn so_cancelada_libera_a_janela_do_quarto() {
        assert!(StayStatus::Confirmed.blocks_room());
        assert!(StayStatus::CheckedIn.blocks_room());
        assert!(StayStatus::CheckedOut.blocks_room());
        assert!(!StayStatus::Cancelled.blocks_room());
    }

    #[test]
    fn reserva_segue_o_fluxo_feliz() {
        assert!(ReservationStatus::Pending.can_transition_to(ReservationStatus::Confirmed));
        assert!(ReservationStatus::Confirmed.can_transition_to(ReservationStatus::InProgress));
        assert!(ReservationStatus::InProgress.can_transition_to(ReservationStatus::Completed));
    }

    #[test]
    fn reserva_nao_pula_etapas() {
        assert!(!ReservationStatus::Pending.can_transition_to(ReservationStatus::InProgress));
        assert!(!ReservationStatus::Pending.can_transition_to(ReservationStatus::Completed));
        assert!(!ReservationStatus::Confirmed.can_transition_to(ReservationStatus::Completed));
    }

    #[test]
    fn reserva_cancela_de_qualquer_nao_terminal() {
        assert!(ReservationStatus::Pending.can_transition_to(ReservationStatus::Cancelled));
        assert!(ReservationStatus::InProgress.can_transition_to(ReservationStatus::Cancelled));
        assert!(!ReservationStatus::Completed.can_transition_to(ReservationStatus::Cancelled));
        assert!(!ReservationStatus::Cancelled.can_transition_to(ReservationStatus::Cancelled));
    }

    #[test]
    fn reserva_terminal_nao_consome_capacidade() {
        assert!(ReservationStatus::Pending.consumes_capacity());
        assert!(ReservationStatus::InProgress.consumes_capacity());
        assert!(!ReservationStatus::Completed.consumes_capacity());
        assert!(!ReservationStatus::Cancelled.consumes_capacity());
    }
}
