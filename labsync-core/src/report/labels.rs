//! Localized (pt-MZ) sheet names, titles, headers and glossary text.

use crate::NotProcessedCause;

pub const SUMMARY_SHEET: &str = "Resumo por US";
pub const STATS_SHEET: &str = "Estatísticas por Distrito";
pub const RESULTS_SHEET: &str = "Resultados de CV";
pub const STALE_PENDING_SHEET: &str = "Pendentes por NID";
pub const UNSYNCED_SHEET: &str = "Pendentes por US";
pub const GLOSSARY_SHEET: &str = "Dicionário";

pub fn summary_title(start: &str, end: &str) -> String {
    format!(
        "Resultados de CV Recebidos no Servidor de Integração no Período de Domingo ({start}) a Sábado ({end}) da semana anterior por US"
    )
}

pub fn stats_title(start: &str, end: &str) -> String {
    format!(
        "Resultados de CVs por Distrito recebidos no Período de Domingo ({start}) a Sábado ({end}) da semana anterior"
    )
}

pub fn results_title(start: &str, end: &str) -> String {
    format!(
        "Resultados de CV Recebidos no Servidor de Integração no Período de Domingo ({start}) a Sábado ({end}) da semana anterior"
    )
}

pub const STALE_PENDING_TITLE: &str =
    "Resultados de CV Pendentes no Servidor de Integração há mais de 48 horas por NID (Cumulativo)";
pub const UNSYNCED_TITLE: &str =
    "Resultados de CV Pendentes no Servidor de Integração há mais de 48 horas por US (Cumulativo)";
pub const GLOSSARY_TITLE: &str = "Dicionário de Variáveis";

/// Second title row shared by every sheet.
pub fn period_line(start: &str, end: &str) -> String {
    format!("Período de reporte: {start} a {end}")
}

pub const SUMMARY_HEADER: [&str; 10] = [
    "Distrito",
    "Código da US",
    "Nome da US",
    "Total Recebidos",
    "No. Processados",
    "No. Pendentes",
    "No. Sem Resultados",
    "No. NID não encontrado",
    "No. NID duplicado",
    "No. ID da requisição duplicado",
];

pub const STATS_HEADER: [&str; 14] = [
    "Distrito",
    "No. Processados",
    "% Processados",
    "No. Pendentes",
    "% Pendentes",
    "No. Sem Resultados",
    "% Sem Resultados",
    "No. NID não encontrado",
    "% NID não encontrado",
    "No. NID duplicado",
    "% NID duplicado",
    "No. ID da requisição duplicado",
    "% ID da requisição duplicado",
    "Total Recebidos",
];

pub const RESULTS_HEADER: [&str; 10] = [
    "REQUEST_ID",
    "NID",
    "Distrito",
    "Código da US",
    "Nome da US",
    "Data de Entrada",
    "Data de Sincronização",
    "Estado",
    "Motivo de Não envio",
    "Observações",
];

pub const STALE_PENDING_HEADER: [&str; 7] = [
    "REQUEST_ID",
    "NID",
    "Distrito",
    "Código da US",
    "Nome da US",
    "Data de Envio",
    "Estado",
];

pub const UNSYNCED_HEADER: [&str; 5] = [
    "Distrito",
    "Código da US",
    "Nome da US",
    "No. CVs Pendentes",
    "Data da Última Sincronização",
];

pub const GLOSSARY_HEADER: [&str; 2] = ["Variável", "Definição"];

pub const GLOSSARY: [(&str, &str); 10] = [
    (
        "Total Recebidos",
        "Número de resultados de carga viral recebidos no servidor de integração no período",
    ),
    (
        "No. Processados",
        "Resultados sincronizados com sucesso para o sistema da US",
    ),
    (
        "No. Pendentes",
        "Resultados recebidos que ainda não foram sincronizados pela US",
    ),
    (
        "No. Sem Resultados",
        "Resultados rejeitados por não conterem um valor de resultado válido",
    ),
    (
        "No. NID não encontrado",
        "Resultados rejeitados porque o NID não existe no sistema da US",
    ),
    (
        "No. NID duplicado",
        "Resultados rejeitados porque o NID está associado a mais de um paciente",
    ),
    (
        "No. ID da requisição duplicado",
        "Resultados rejeitados porque o ID da requisição já tinha sido recebido",
    ),
    (
        "% (percentagem)",
        "Quantidade da categoria multiplicada por 100 e dividida pelo Total Recebidos do distrito",
    ),
    (
        "Pendentes há mais de 48 horas",
        "Resultados ainda pendentes mais de dois dias após a entrada no servidor, independentemente do período",
    ),
    (
        "Data da Última Sincronização",
        "Data mais recente em que a US actualizou algum resultado no servidor de integração",
    ),
];

/// Explanation shown in the "Observações" column of a rejected record.
pub const fn cause_note(cause: NotProcessedCause) -> &'static str {
    match cause {
        NotProcessedCause::InvalidResult => "Resultado sem valor válido",
        NotProcessedCause::NidNotFound => "NID não encontrado no sistema da US",
        NotProcessedCause::DuplicateNid => "NID associado a mais de um paciente",
        NotProcessedCause::DuplicatedRequestId => "ID da requisição já recebido anteriormente",
    }
}
