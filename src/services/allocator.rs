// src/services/allocator.rs
//
// Alocador de intervalos: lógica de decisão PURA, sem efeito colateral.
// Quem chama é responsável por travar a linha do recurso (SELECT ... FOR
// UPDATE) e gravar a nova ocupação na MESMA transação que fez a checagem;
// sem isso duas requisições concorrentes podem enxergar "sem conflito" e
// gravar janelas sobrepostas.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::common::error::AppError;

/// Janela de uma ocupação já existente e não terminal do recurso.
/// `FromRow` porque os repositórios materializam isso direto do banco.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BookingWindow {
    pub id: Uuid,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub quantity: i32,
}

/// Resultado da checagem: quem conflita e quantas vagas já estão tomadas
/// em algum ponto da janela proposta.
#[derive(Debug, Clone)]
pub struct ConflictReport {
    pub conflicting: Vec<Uuid>,
    pub booked_quantity: i32,
}

impl ConflictReport {
    pub fn has_conflict(&self) -> bool {
        !self.conflicting.is_empty()
    }
}

/// Dois intervalos semiabertos [s1, e1) e [s2, e2) conflitam sse
/// s1 < e2 e s2 < e1. Encostar na fronteira (check-out às 11h, check-in
/// às 11h) NÃO conflita; é o giro normal de quarto.
pub fn overlaps(
    s1: DateTime<Utc>,
    e1: DateTime<Utc>,
    s2: DateTime<Utc>,
    e2: DateTime<Utc>,
) -> bool {
    s1 < e2 && s2 < e1
}

/// Avalia a janela proposta contra as ocupações existentes.
/// `excluding` pula a própria reserva quando se está reavaliando uma
/// edição (senão ela conflitaria consigo mesma).
pub fn check_conflict(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    existing: &[BookingWindow],
    excluding: Option<Uuid>,
) -> Result<ConflictReport, AppError> {
    if starts_at >= ends_at {
        return Err(AppError::InvalidInput(
            "O início da janela deve ser anterior ao fim.".into(),
        ));
    }

    let mut conflicting = Vec::new();
    let mut booked_quantity = 0;
    for w in existing {
        if Some(w.id) == excluding {
            continue;
        }
        if overlaps(starts_at, ends_at, w.starts_at, w.ends_at) {
            conflicting.push(w.id);
            booked_quantity += w.quantity;
        }
    }

    Ok(ConflictReport {
        conflicting,
        booked_quantity,
    })
}

/// Admissão para recurso com capacidade N: a soma das quantidades já
/// conflitantes mais a pedida não pode passar da capacidade configurada.
/// Para capacidade 1 (quarto, mesa) qualquer conflito já rejeita.
pub fn ensure_capacity(
    report: &ConflictReport,
    requested_quantity: i32,
    capacity: i32,
) -> Result<(), AppError> {
    if requested_quantity < 1 {
        return Err(AppError::InvalidInput(
            "Quantidade deve ser no mínimo 1.".into(),
        ));
    }
    if report.booked_quantity + requested_quantity > capacity {
        return Err(AppError::Conflict(format!(
            "Capacidade excedida: {} de {} vaga(s) já ocupada(s) na janela.",
            report.booked_quantity, capacity
        )));
    }
    Ok(())
}

/// Atalho para recursos exclusivos (quartos): conflito algum é permitido.
pub fn ensure_exclusive(report: &ConflictReport) -> Result<(), AppError> {
    if report.has_conflict() {
        return Err(AppError::Conflict(
            "O recurso já está ocupado no período solicitado.".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, hour, 0, 0).unwrap()
    }

    fn window(starts: DateTime<Utc>, ends: DateTime<Utc>, quantity: i32) -> BookingWindow {
        BookingWindow {
            id: Uuid::new_v4(),
            starts_at: starts,
            ends_at: ends,
            quantity,
        }
    }

    #[test]
    fn fronteira_encostada_nao_conflita() {
        // [14h dia 1, 11h dia 2) e [11h dia 2, 14h dia 2): giro de quarto.
        assert!(!overlaps(t(1, 14), t(2, 11), t(2, 11), t(2, 14)));
        assert!(!overlaps(t(2, 11), t(2, 14), t(1, 14), t(2, 11)));
    }

    #[test]
    fn sobreposicao_parcial_conflita() {
        assert!(overlaps(t(1, 0), t(5, 0), t(3, 0), t(6, 0)));
        assert!(overlaps(t(3, 0), t(6, 0), t(1, 0), t(5, 0)));
    }

    #[test]
    fn janela_contida_conflita() {
        assert!(overlaps(t(1, 0), t(10, 0), t(3, 0), t(4, 0)));
    }

    #[test]
    fn inicio_igual_ou_depois_do_fim_e_rejeitado() {
        assert!(check_conflict(t(2, 0), t(2, 0), &[], None).is_err());
        assert!(check_conflict(t(3, 0), t(2, 0), &[], None).is_err());
    }

    #[test]
    fn cenario_do_quarto_exclusivo() {
        // A: [1, 5) entra. B: [3, 6) conflita. C: [5, 8) encosta e entra.
        let a = window(t(1, 0), t(5, 0), 1);
        let existing = vec![a.clone()];

        let b = check_conflict(t(3, 0), t(6, 0), &existing, None).unwrap();
        assert_eq!(b.conflicting, vec![a.id]);
        assert!(ensure_exclusive(&b).is_err());

        let c = check_conflict(t(5, 0), t(8, 0), &existing, None).unwrap();
        assert!(!c.has_conflict());
        assert!(ensure_exclusive(&c).is_ok());
    }

    #[test]
    fn capacidade_soma_apenas_janelas_conflitantes() {
        let existing = vec![
            window(t(1, 8), t(1, 10), 2),  // conflita
            window(t(1, 9), t(1, 11), 1),  // conflita
            window(t(1, 12), t(1, 14), 4), // fora da janela
        ];
        let report = check_conflict(t(1, 9), t(1, 10), &existing, None).unwrap();
        assert_eq!(report.booked_quantity, 3);

        // Capacidade 4: mais 1 cabe, mais 2 não.
        assert!(ensure_capacity(&report, 1, 4).is_ok());
        assert!(matches!(
            ensure_capacity(&report, 2, 4),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn quantidade_pedida_deve_ser_positiva() {
        let report = ConflictReport {
            conflicting: vec![],
            booked_quantity: 0,
        };
        assert!(matches!(
            ensure_capacity(&report, 0, 4),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn edicao_exclui_a_propria_reserva() {
        let a = window(t(1, 0), t(5, 0), 1);
        let existing = vec![a.clone()];

        // Reavaliando a própria janela de A: sem exclusão conflita,
        // com exclusão passa.
        let sem = check_conflict(t(2, 0), t(6, 0), &existing, None).unwrap();
        assert!(sem.has_conflict());

        let com = check_conflict(t(2, 0), t(6, 0), &existing, Some(a.id)).unwrap();
        assert!(!com.has_conflict());
    }
}
