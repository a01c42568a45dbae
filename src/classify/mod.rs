//! Program → knowledge-area classification.
//!
//! The table is exact-match on the trimmed, uppercased program name. Anything
//! not listed falls back to `KnowledgeArea::Other`.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use crate::domain::{KnowledgeArea, Record};

/// Programs per area. Versioned with the code; not editable at runtime.
pub const AREA_TABLE: &[(KnowledgeArea, &[&str])] = &[
    (
        KnowledgeArea::AgrarianSciences,
        &["AGRONOMIA", "ENGENHARIA DE ALIMENTOS", "ENGENHARIA DE PESCA", "ZOOTECNIA"],
    ),
    (
        KnowledgeArea::BiologicalSciences,
        &["CIENCIAS BIOLOGICAS", "BIOTECNOLOGIA", "BIOLOGIA"],
    ),
    (
        KnowledgeArea::HealthSciences,
        &[
            "ENFERMAGEM",
            "EDUCACAO FISICA",
            "MEDICINA",
            "FISIOTERAPIA",
            "ODONTOLOGIA",
            "FARMACIA",
            "PSICOLOGIA",
            "NUTRICAO",
            "BIOMEDICINA",
        ],
    ),
    (
        KnowledgeArea::ExactEarthSciences,
        &[
            "CIENCIA DA COMPUTACAO",
            "COMPUTACAO",
            "INFORMATICA",
            "FISICA",
            "MATEMATICA",
            "QUIMICA",
            "ESTATISTICA",
            "ENGENHARIA DE SOFTWARE",
            "ENGENHARIA DA COMPUTACAO",
            "SISTEMAS DE INFORMACAO",
            "CIENCIA DE DADOS",
        ],
    ),
    (
        KnowledgeArea::HumanSciences,
        &["FILOSOFIA", "HISTORIA", "SOCIOLOGIA", "LETRAS", "PEDAGOGIA", "GEOGRAFIA"],
    ),
    (
        KnowledgeArea::AppliedSocialSciences,
        &[
            "ADMINISTRACAO",
            "CIENCIAS ECONOMICAS",
            "DIREITO",
            "PUBLICIDADE",
            "JORNALISMO",
            "TURISMO",
            "LOGISTICA",
            "CONTABILIDADE",
            "GESTAO",
        ],
    ),
    (
        KnowledgeArea::Engineering,
        &[
            "ENGENHARIA CIVIL",
            "ENGENHARIA ELETRICA",
            "ENGENHARIA MECANICA",
            "ENGENHARIA METALURGICA",
            "ENGENHARIA QUIMICA",
            "ENGENHARIA DE PRODUCAO",
            "ENGENHARIA AMBIENTAL",
        ],
    ),
    (
        KnowledgeArea::LinguisticsArts,
        &["ARTES", "MUSICA", "DANCA", "TEATRO", "CINEMA", "DESIGN", "CINEMA E AUDIOVISUAL"],
    ),
    (KnowledgeArea::Other, &["OUTROS"]),
];

static PROGRAM_TO_AREA: LazyLock<HashMap<&'static str, KnowledgeArea>> = LazyLock::new(|| {
    AREA_TABLE
        .iter()
        .flat_map(|(area, programs)| programs.iter().map(move |p| (*p, *area)))
        .collect()
});

/// Classify a raw program name. Never fails.
pub fn classify_program(program: &str) -> KnowledgeArea {
    let key = program.trim().to_uppercase();
    PROGRAM_TO_AREA
        .get(key.as_str())
        .copied()
        .unwrap_or(KnowledgeArea::Other)
}

/// Distinct program names (as they appear in the data) that hit the fallback
/// without being listed under `OUTROS` explicitly.
pub fn unmatched_programs(records: &[Record]) -> BTreeSet<&str> {
    records
        .iter()
        .filter(|r| r.area == KnowledgeArea::Other)
        .map(|r| r.program.trim())
        .filter(|p| !PROGRAM_TO_AREA.contains_key(p.to_uppercase().as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_names_map_to_their_area() {
        assert_eq!(classify_program("MEDICINA"), KnowledgeArea::HealthSciences);
        assert_eq!(classify_program("FILOSOFIA"), KnowledgeArea::HumanSciences);
        assert_eq!(classify_program("ENGENHARIA CIVIL"), KnowledgeArea::Engineering);
        assert_eq!(classify_program("CINEMA E AUDIOVISUAL"), KnowledgeArea::LinguisticsArts);
    }

    #[test]
    fn lookup_trims_and_uppercases() {
        assert_eq!(classify_program("  medicina "), KnowledgeArea::HealthSciences);
        assert_eq!(classify_program("Ciencia de Dados"), KnowledgeArea::ExactEarthSciences);
        assert_eq!(classify_program("Ciência de Dados"), KnowledgeArea::Other);
    }

    #[test]
    fn unknown_programs_fall_back_to_other() {
        assert_eq!(classify_program("ENGENHARIA NUCLEAR"), KnowledgeArea::Other);
        assert_eq!(classify_program(""), KnowledgeArea::Other);
        assert_eq!(classify_program("OUTROS"), KnowledgeArea::Other);
    }

    #[test]
    fn matching_is_exact_not_substring() {
        assert_eq!(classify_program("MEDICINA VETERINARIA"), KnowledgeArea::Other);
        assert_eq!(classify_program("ENGENHARIA"), KnowledgeArea::Other);
    }

    #[test]
    fn every_listed_program_belongs_to_exactly_one_area() {
        let listed: usize = AREA_TABLE.iter().map(|(_, programs)| programs.len()).sum();
        assert_eq!(PROGRAM_TO_AREA.len(), listed);
        for (area, programs) in AREA_TABLE {
            for program in *programs {
                assert_eq!(classify_program(program), *area, "{program}");
            }
        }
    }

    #[test]
    fn unmatched_programs_skip_explicit_outros() {
        let record = |program: &str| Record {
            program: program.to_string(),
            sex: None,
            race: None,
            year: None,
            campus: None,
            area: classify_program(program),
        };
        let records = vec![
            record("ENGENHARIA NUCLEAR"),
            record("OUTROS"),
            record("MEDICINA"),
            record("ENGENHARIA NUCLEAR"),
        ];
        let unmatched: Vec<&str> = unmatched_programs(&records).into_iter().collect();
        assert_eq!(unmatched, vec!["ENGENHARIA NUCLEAR"]);
    }
}
