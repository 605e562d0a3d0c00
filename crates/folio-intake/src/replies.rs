// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed reply texts.

use folio_core::TicketCategory;

use crate::engine::Reply;

pub const MENU: &str = "👨‍💻 *INFORMÁTICA Y SEGURIDAD*\n\
Responde con un número:\n\
1) Soporte técnico (PC/Redes)\n\
2) Ciberseguridad (hackeo, cuentas, phishing)\n\
3) CCTV / Alarmas / Control de acceso\n\
4) Cotización / Paquetes\n\
5) Hablar con un asesor\n\n\
Escribe *menu* en cualquier momento.";

pub const SUPPORT_PROMPT: &str = "🛠️ *Soporte técnico*\n\
Describe el problema (equipo, falla, si es red/WiFi, desde cuándo).";

pub const SECURITY_PROMPT: &str = "🛡️ *Ciberseguridad*\n\
¿Qué pasó? (cuenta comprometida, phishing, robo de WhatsApp, etc.).\n\
Incluye: plataforma y hora aproximada.";

pub const SURVEILLANCE_PROMPT: &str = "📷 *CCTV/Alarmas/Acceso*\n\
¿Qué necesitas? (instalación, mantenimiento, número de cámaras, ubicación).";

pub const OTHER_PROMPT: &str = "📝 Cuéntanos con detalle qué necesitas.";

pub const PACKAGES: &str = "💳 *Cotizaciones / Paquetes*\n\
Dime qué te interesa:\n\
- Soporte (domicilio/remoto)\n\
- Redes (cableado/WiFi)\n\
- Seguridad (auditoría, hardening, respaldo)\n\
- CCTV\n\n\
Escribe *menu* para volver.";

pub const ADVISOR: &str = "👤 Para hablar con un asesor, por favor envía:\n\
1) Nombre\n2) Colonia/Ciudad\n3) Mejor horario\n\n\
En breve te contactan.";

pub const INVALID_OPTION: &str = "Opción no válida. Responde 1-5, o escribe *menu*.";

/// Folio line used when no ticket could take the details.
pub const FOLIO_UNAVAILABLE: &str = "Folio: (no disponible)";

/// Prompt asking for the details of a freshly opened ticket.
pub fn details_prompt(category: TicketCategory) -> &'static str {
    match category {
        TicketCategory::Support => SUPPORT_PROMPT,
        TicketCategory::Security => SECURITY_PROMPT,
        TicketCategory::Surveillance => SURVEILLANCE_PROMPT,
        TicketCategory::Other => OTHER_PROMPT,
    }
}

/// Confirmation after details were collected.
pub fn confirmation(ticket_id: Option<i64>) -> String {
    let folio = match ticket_id {
        Some(id) => format!("Folio: #{id}"),
        None => FOLIO_UNAVAILABLE.to_string(),
    };
    format!(
        "✅ Listo, registré tu solicitud.\n{folio}\n\
         En breve te respondemos.\n\n\
         Escribe *menu* para ver opciones."
    )
}

/// Final text for `reply`. `ticket_id` is only read by
/// [`Reply::Confirmation`].
pub fn render(reply: Reply, ticket_id: Option<i64>) -> String {
    match reply {
        Reply::Menu => MENU.to_string(),
        Reply::DetailsPrompt(category) => details_prompt(category).to_string(),
        Reply::Packages => PACKAGES.to_string(),
        Reply::Advisor => ADVISOR.to_string(),
        Reply::InvalidOption => INVALID_OPTION.to_string(),
        Reply::Confirmation => confirmation(ticket_id),
    }
}
