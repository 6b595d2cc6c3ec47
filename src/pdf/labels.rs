//! Fixed PDF text in each supported language

use crate::report::Language;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Labels {
    pub title: &'static str,
    pub month: &'static str,
    pub period: &'static str,
    pub selected_agents: &'static str,
    pub generated: &'static str,
    /// Team, agent name, previous month, annualized premium
    pub headers: [&'static str; 4],
    pub total: &'static str,
}

const ENGLISH: Labels = Labels {
    title: "Monthly Agent Premiums Report",
    month: "Month",
    period: "Period",
    selected_agents: "selected agents",
    generated: "Generated",
    headers: ["Team", "Agent Name", "Previous Month", "Annualized Premium"],
    total: "TOTAL",
};

const SPANISH: Labels = Labels {
    title: "Reporte de Primas Mensuales de Agentes",
    month: "Mes",
    period: "Periodo",
    selected_agents: "agentes seleccionados",
    generated: "Generado",
    headers: ["Equipo", "Nombre del Agente", "Mes Anterior", "Prima Anualizada"],
    total: "TOTAL",
};

impl Labels {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::En => ENGLISH,
            Language::Es => SPANISH,
        }
    }

    /// Label sets for every language, used when re-reading a document
    pub fn all() -> [Labels; 2] {
        [ENGLISH, SPANISH]
    }
}
