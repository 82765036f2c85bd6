// src/services/import_service.rs
//
// O pipeline de importação em massa: bytes do upload → linhas tabulares →
// mapeamento de campos → reconciliação por telefone. As linhas são
// processadas uma a uma, na ordem de entrada; a falha de uma linha nunca
// derruba o lote.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use calamine::{open_workbook_auto_from_rs, Reader};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ContactStore,
    models::contact::{ImportFailure, ImportSummary, ImportedContact},
};

// Quantas linhas da entrada original ecoamos no resumo, para a tela de
// confirmação do usuário.
const SAMPLE_SIZE: usize = 5;

// Tabela de sinônimos da coluna de telefone, em ordem de preferência.
// O cabeçalho é comparado em minúsculas.
const PHONE_COLUMNS: [&str; 2] = ["telefone", "contato"];
const NAME_COLUMN: &str = "nome";

/// Política para quando o telefone importado já pertence a outro usuário.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipPolicy {
    /// Comportamento histórico do produto: a importação transfere o contato
    /// para quem importou, sem avisar o dono anterior.
    Reassign,
    /// Telefone de outro dono conta como falha da linha, sem transferência.
    RejectConflict,
}

impl OwnershipPolicy {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "reject-conflict" | "reject_conflict" => Self::RejectConflict,
            _ => Self::Reassign,
        }
    }
}

enum RowOutcome {
    Inserted,
    Updated,
}

#[derive(Clone)]
pub struct ImportService {
    store: Arc<dyn ContactStore>,
    policy: OwnershipPolicy,
}

impl ImportService {
    pub fn new(store: Arc<dyn ContactStore>, policy: OwnershipPolicy) -> Self {
        Self { store, policy }
    }

    /// Modo arquivo: recebe o upload inteiro em memória, detecta o formato
    /// pela extensão e corre o pipeline completo.
    pub async fn import_upload(
        &self,
        filename: &str,
        data: &[u8],
        owner_id: Uuid,
    ) -> Result<ImportSummary, AppError> {
        let raw_rows = parse_upload(filename, data)?;
        let rows = map_rows(&raw_rows);

        tracing::info!(
            "📥 Importação de '{}': {} linhas lidas, {} válidas",
            filename,
            raw_rows.len(),
            rows.len()
        );

        Ok(self.reconcile(&rows, owner_id).await)
    }

    /// O motor de reconciliação. Para cada linha: normaliza o telefone,
    /// procura o contato global por essa chave e faz upsert reatribuindo o
    /// dono. Erros de persistência são contados por linha e o lote continua.
    pub async fn reconcile(&self, rows: &[ImportedContact], owner_id: Uuid) -> ImportSummary {
        let mut summary = ImportSummary::empty();
        summary.sample = rows.iter().take(SAMPLE_SIZE).cloned().collect();

        for row in rows {
            let telefone = normalize_phone(&row.telefone);
            if telefone.is_empty() {
                // Linha sem nenhum dígito: pulada em silêncio, não conta
                // nem como sucesso nem como falha.
                tracing::debug!("Linha ignorada, telefone sem dígitos: '{}'", row.telefone);
                continue;
            }

            match self.reconcile_row(&telefone, &row.nome, owner_id).await {
                Ok(RowOutcome::Inserted) => summary.inserted += 1,
                Ok(RowOutcome::Updated) => summary.updated += 1,
                Err(err) => {
                    tracing::warn!("Falha ao importar o telefone {}: {}", telefone, err);
                    summary.failed += 1;
                    summary.failures.push(ImportFailure {
                        telefone: telefone.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        summary
    }

    async fn reconcile_row(
        &self,
        telefone: &str,
        nome: &str,
        owner_id: Uuid,
    ) -> Result<RowOutcome, AppError> {
        match self.store.find_by_phone(telefone).await? {
            Some(existing) => {
                if self.policy == OwnershipPolicy::RejectConflict
                    && existing.owner_id != owner_id
                {
                    return Err(AppError::UniqueConstraintViolation(format!(
                        "O telefone '{}' pertence a outro usuário.",
                        telefone
                    )));
                }

                self.store.update(existing.id, owner_id, nome).await?;
                Ok(RowOutcome::Updated)
            }
            None => {
                self.store.create(owner_id, nome, telefone).await?;
                Ok(RowOutcome::Inserted)
            }
        }
    }
}

/// Projeta a string para a chave canônica: só os dígitos ASCII, na ordem
/// original. Nenhuma validação de tamanho acontece aqui.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Mapeia uma linha crua (cabeçalho → valor) para um contato candidato.
/// Cabeçalhos casam sem distinção de maiúsculas; o telefone vem da primeira
/// coluna sinônima com valor não vazio. Linha sem nome ou sem telefone é
/// descartada (antes da normalização).
fn map_row(row: &HashMap<String, String>) -> Option<ImportedContact> {
    let mut lowered: HashMap<String, &str> = HashMap::with_capacity(row.len());
    for (key, value) in row {
        lowered.insert(key.trim().to_lowercase(), value.as_str());
    }

    let nome = lowered.get(NAME_COLUMN).map_or("", |v| v.trim());

    let telefone = PHONE_COLUMNS
        .iter()
        .filter_map(|col| lowered.get(*col))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .unwrap_or("");

    if nome.is_empty() || telefone.is_empty() {
        return None;
    }

    Some(ImportedContact {
        nome: nome.to_string(),
        telefone: telefone.to_string(),
    })
}

fn map_rows(raw_rows: &[HashMap<String, String>]) -> Vec<ImportedContact> {
    raw_rows.iter().filter_map(map_row).collect()
}

/// Detecta o formato pela extensão do arquivo: `.csv` vai para o parser CSV,
/// qualquer outra coisa é tratada como pasta de trabalho de planilha.
fn parse_upload(filename: &str, data: &[u8]) -> Result<Vec<HashMap<String, String>>, AppError> {
    if filename.to_lowercase().ends_with(".csv") {
        parse_csv_rows(data)
    } else {
        parse_sheet_rows(data)
    }
}

fn parse_csv_rows(data: &[u8]) -> Result<Vec<HashMap<String, String>>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::UnreadableUpload(format!("cabeçalho CSV inválido: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| AppError::UnreadableUpload(format!("CSV malformado: {e}")))?;
        let mut map = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            if let Some(value) = record.get(i) {
                map.insert(header.clone(), value.to_string());
            }
        }
        rows.push(map);
    }

    Ok(rows)
}

/// Lê somente a primeira aba da pasta de trabalho; abas seguintes são
/// ignoradas.
fn parse_sheet_rows(data: &[u8]) -> Result<Vec<HashMap<String, String>>, AppError> {
    let cursor = Cursor::new(data.to_vec());
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| AppError::UnreadableUpload(format!("planilha inválida: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AppError::UnreadableUpload("planilha sem abas".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| AppError::UnreadableUpload(format!("falha ao ler a aba '{sheet_name}': {e}")))?;

    let mut row_iter = range.rows();

    let header_row = row_iter
        .next()
        .ok_or_else(|| AppError::UnreadableUpload("planilha sem cabeçalho".to_string()))?;

    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for row in row_iter {
        let mut map = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            let value = row.get(i).map(|cell| cell.to_string()).unwrap_or_default();
            map.insert(header.clone(), value);
        }
        rows.push(map);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::models::contact::Contact;

    // Dublê em memória do ContactStore: um Vec protegido por Mutex e um
    // conjunto de telefones que devem falhar na escrita.
    #[derive(Default)]
    struct MemoryStore {
        contacts: Mutex<Vec<Contact>>,
        fail_phones: HashSet<String>,
    }

    impl MemoryStore {
        fn failing_on(phones: &[&str]) -> Self {
            Self {
                contacts: Mutex::new(Vec::new()),
                fail_phones: phones.iter().map(|p| p.to_string()).collect(),
            }
        }

        fn snapshot(&self) -> Vec<Contact> {
            self.contacts.lock().unwrap().clone()
        }

        fn seed(&self, owner_id: Uuid, nome: &str, telefone: &str) {
            let now = Utc::now();
            self.contacts.lock().unwrap().push(Contact {
                id: Uuid::new_v4(),
                owner_id,
                nome: nome.to_string(),
                telefone: telefone.to_string(),
                created_at: now,
                updated_at: now,
            });
        }
    }

    #[async_trait]
    impl ContactStore for MemoryStore {
        async fn find_by_phone(&self, telefone: &str) -> Result<Option<Contact>, AppError> {
            let contacts = self.contacts.lock().unwrap();
            Ok(contacts.iter().find(|c| c.telefone == telefone).cloned())
        }

        async fn create(
            &self,
            owner_id: Uuid,
            nome: &str,
            telefone: &str,
        ) -> Result<Contact, AppError> {
            if self.fail_phones.contains(telefone) {
                return Err(AppError::InternalServerError(anyhow::anyhow!(
                    "falha simulada"
                )));
            }
            let now = Utc::now();
            let contact = Contact {
                id: Uuid::new_v4(),
                owner_id,
                nome: nome.to_string(),
                telefone: telefone.to_string(),
                created_at: now,
                updated_at: now,
            };
            self.contacts.lock().unwrap().push(contact.clone());
            Ok(contact)
        }

        async fn update(
            &self,
            id: Uuid,
            owner_id: Uuid,
            nome: &str,
        ) -> Result<Contact, AppError> {
            let mut contacts = self.contacts.lock().unwrap();
            let contact = contacts
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or(AppError::ContactNotFound)?;
            if self.fail_phones.contains(&contact.telefone) {
                return Err(AppError::InternalServerError(anyhow::anyhow!(
                    "falha simulada"
                )));
            }
            contact.nome = nome.to_string();
            contact.owner_id = owner_id;
            contact.updated_at = Utc::now();
            Ok(contact.clone())
        }
    }

    fn service(store: MemoryStore) -> (ImportService, Arc<MemoryStore>) {
        let store = Arc::new(store);
        (
            ImportService::new(store.clone(), OwnershipPolicy::Reassign),
            store,
        )
    }

    fn row(nome: &str, telefone: &str) -> ImportedContact {
        ImportedContact {
            nome: nome.to_string(),
            telefone: telefone.to_string(),
        }
    }

    #[test]
    fn test_normalize_strips_formatting() {
        assert_eq!(normalize_phone("(11) 91234-5678"), "11912345678");
        assert_eq!(normalize_phone("+55 11 91234 5678"), "5511912345678");
        assert_eq!(normalize_phone("abc"), "");
        assert_eq!(normalize_phone(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["(11) 91234-5678", "11912345678", "", "tel: 99"] {
            let once = normalize_phone(raw);
            assert_eq!(normalize_phone(&once), once);
        }
    }

    #[test]
    fn test_map_row_matches_headers_case_insensitively() {
        let mut raw = HashMap::new();
        raw.insert("NOME".to_string(), " Ana ".to_string());
        raw.insert("Telefone".to_string(), "(11) 91234-5678".to_string());

        let mapped = map_row(&raw).unwrap();
        assert_eq!(mapped.nome, "Ana");
        assert_eq!(mapped.telefone, "(11) 91234-5678");
    }

    #[test]
    fn test_map_row_falls_back_to_contato() {
        let mut raw = HashMap::new();
        raw.insert("nome".to_string(), "Bia".to_string());
        raw.insert("contato".to_string(), "11988887777".to_string());
        assert_eq!(map_row(&raw).unwrap().telefone, "11988887777");

        // `telefone` presente mas vazio também cai no sinônimo
        raw.insert("telefone".to_string(), "  ".to_string());
        assert_eq!(map_row(&raw).unwrap().telefone, "11988887777");
    }

    #[test]
    fn test_map_row_drops_incomplete_rows() {
        let mut sem_telefone = HashMap::new();
        sem_telefone.insert("nome".to_string(), "Carlos".to_string());
        sem_telefone.insert("telefone".to_string(), "".to_string());
        assert!(map_row(&sem_telefone).is_none());

        let mut sem_nome = HashMap::new();
        sem_nome.insert("nome".to_string(), "  ".to_string());
        sem_nome.insert("telefone".to_string(), "11912345678".to_string());
        assert!(map_row(&sem_nome).is_none());
    }

    #[test]
    fn test_map_row_keeps_formatting_only_phone() {
        // Um telefone só com formatação passa pelo mapeador; é a
        // reconciliação que decide pular quando a normalização der vazio.
        let mut raw = HashMap::new();
        raw.insert("nome".to_string(), "Dani".to_string());
        raw.insert("telefone".to_string(), "(--) ----".to_string());
        assert!(map_row(&raw).is_some());
    }

    #[test]
    fn test_parse_csv_rows_uses_header_as_keys() {
        let data = b"Nome,Telefone\nAna,(11) 91234-5678\nBia,11988887777\n";
        let rows = parse_csv_rows(data).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Nome"], "Ana");
        assert_eq!(rows[1]["Telefone"], "11988887777");
    }

    #[test]
    fn test_parse_upload_rejects_garbage_sheet() {
        let err = parse_upload("contatos.xlsx", b"isto nao e uma planilha").unwrap_err();
        assert!(matches!(err, AppError::UnreadableUpload(_)));
    }

    #[test]
    fn test_parse_upload_sniffs_csv_by_extension() {
        let rows = parse_upload("CONTATOS.CSV", b"nome,telefone\nAna,11912345678\n").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_reconcile_inserts_then_updates_same_phone() {
        // Ana e Bia normalizam para o mesmo telefone: deve sobrar um único
        // contato com o nome da última linha.
        let (service, store) = service(MemoryStore::default());
        let owner = Uuid::new_v4();

        let rows = vec![
            row("Ana", "(11) 91234-5678"),
            row("Bia", "11912345678"),
        ];
        let summary = service.reconcile(&rows, owner).await;

        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.failed, 0);

        let contacts = store.snapshot();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].nome, "Bia");
        assert_eq!(contacts[0].telefone, "11912345678");
    }

    #[tokio::test]
    async fn test_reconcile_reassigns_owner_by_default() {
        let (service, store) = service(MemoryStore::default());
        let previous_owner = Uuid::new_v4();
        let importer = Uuid::new_v4();
        store.seed(previous_owner, "Maria", "11912345678");

        let summary = service.reconcile(&[row("Maria Souza", "11912345678")], importer).await;

        assert_eq!(summary.updated, 1);
        let contacts = store.snapshot();
        assert_eq!(contacts[0].owner_id, importer);
        assert_eq!(contacts[0].nome, "Maria Souza");
    }

    #[tokio::test]
    async fn test_reject_conflict_policy_counts_failure() {
        let store = Arc::new(MemoryStore::default());
        let service = ImportService::new(store.clone(), OwnershipPolicy::RejectConflict);
        let previous_owner = Uuid::new_v4();
        let importer = Uuid::new_v4();
        store.seed(previous_owner, "Maria", "11912345678");

        let summary = service.reconcile(&[row("Maria Souza", "11912345678")], importer).await;

        assert_eq!(summary.updated, 0);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures[0].telefone, "11912345678");

        // Nada foi transferido nem renomeado
        let contacts = store.snapshot();
        assert_eq!(contacts[0].owner_id, previous_owner);
        assert_eq!(contacts[0].nome, "Maria");
    }

    #[tokio::test]
    async fn test_reconcile_failure_does_not_abort_batch() {
        let (service, store) = service(MemoryStore::failing_on(&["11900000000"]));
        let owner = Uuid::new_v4();

        let rows = vec![
            row("Ana", "11911111111"),
            row("Erro", "11900000000"),
            row("Bia", "11922222222"),
        ];
        let summary = service.reconcile(&rows, owner).await;

        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].telefone, "11900000000");

        // A linha seguinte à falha foi processada normalmente
        assert_eq!(store.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn test_reconcile_skips_digitless_phone_silently() {
        let (service, store) = service(MemoryStore::default());
        let owner = Uuid::new_v4();

        let summary = service.reconcile(&[row("Dani", "(--) ----")], owner).await;

        assert_eq!(summary.inserted, 0);
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.failed, 0);
        assert!(summary.failures.is_empty());
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_samples_first_five_original_rows() {
        let (service, _store) = service(MemoryStore::default());
        let owner = Uuid::new_v4();

        let rows: Vec<ImportedContact> = (0..8)
            .map(|i| row(&format!("Contato {i}"), &format!("(11) 9000-000{i}")))
            .collect();
        let summary = service.reconcile(&rows, owner).await;

        assert_eq!(summary.sample.len(), 5);
        // O sample ecoa a entrada original, antes da normalização
        assert_eq!(summary.sample[0].telefone, "(11) 9000-0000");
    }

    #[tokio::test]
    async fn test_import_upload_runs_full_pipeline() {
        let (service, store) = service(MemoryStore::default());
        let owner = Uuid::new_v4();

        let csv = b"Nome,Contato\nAna,(11) 91234-5678\nCarlos,\n";
        let summary = service.import_upload("contatos.csv", csv, owner).await.unwrap();

        // Carlos não tem telefone: descartado pelo mapeador, sem entrada de falha
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.failed, 0);
        assert_eq!(store.snapshot()[0].telefone, "11912345678");
    }

    #[test]
    fn test_ownership_policy_parse() {
        assert_eq!(OwnershipPolicy::parse("reject-conflict"), OwnershipPolicy::RejectConflict);
        assert_eq!(OwnershipPolicy::parse("REJECT_CONFLICT"), OwnershipPolicy::RejectConflict);
        assert_eq!(OwnershipPolicy::parse("reassign"), OwnershipPolicy::Reassign);
        assert_eq!(OwnershipPolicy::parse(""), OwnershipPolicy::Reassign);
    }
}
