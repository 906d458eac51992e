//! Line-oriented terminal front end: password prompt, then a chat loop.

use std::io::Write;

use catalog_ai::{CatalogAssistant, ChatError, ChatSession, Role, Turn};
use catalog_config::schema::UiConfig;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::sync::mpsc;

const EXIT_COMMAND: &str = "/salir";
const HISTORY_COMMAND: &str = "/historial";
const INTERRUPTED_NOTICE: &str = "⚠️ Respuesta interrumpida (no se guardó en el historial)";

/// Text shown to the user for a failed operation.
pub fn error_message(err: &ChatError) -> String {
    match err {
        ChatError::WrongPassword => "😕 Clave incorrecta".to_string(),
        ChatError::Locked => "🔒 Ingrese la clave de acceso primero".to_string(),
        ChatError::DocumentNotFound(path) => format!(
            "⚠️ No se encontró el archivo '{}' en el directorio.",
            path.display()
        ),
        ChatError::UploadFailed(e) => format!("Error al cargar el catálogo: {e}"),
        ChatError::QueryFailed(e) => format!("Error en la consulta: {e}"),
    }
}

pub fn render_turn(turn: &Turn) -> String {
    match turn.role() {
        Role::User => format!("🧑 Tú: {}", turn.text()),
        Role::Assistant => format!("🤖 Agente: {}", turn.text()),
    }
}

/// Drive one session until the user exits or input ends.
pub async fn run<R, W>(
    assistant: &CatalogAssistant,
    session: &mut ChatSession,
    ui: &UiConfig,
    stream: bool,
    input: R,
    out: &mut W,
) -> catalog_common::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    if !unlock(session, ui, &mut lines, out).await? {
        return Ok(());
    }

    writeln!(out, "\n🤖 {}", ui.title)?;
    writeln!(out, "{}", ui.subtitle)?;
    match assistant.prepare().await {
        Ok(handle) => tracing::debug!(document = handle.name(), "catalog ready"),
        Err(e) => writeln!(out, "{}", error_message(&e))?,
    }
    writeln!(out, "({}: {EXIT_COMMAND}, {HISTORY_COMMAND})", ui.placeholder)?;

    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let prompt = line.trim();
        match prompt {
            "" => continue,
            EXIT_COMMAND => break,
            HISTORY_COMMAND => {
                for turn in session.history() {
                    writeln!(out, "{}", render_turn(turn))?;
                }
                continue;
            }
            _ => {}
        }

        writeln!(out, "{}", ui.busy_message)?;
        let result = if stream {
            ask_streaming(assistant, session, prompt.to_string(), out).await?
        } else {
            let result = assistant.ask(session, prompt.to_string()).await;
            if let Ok(turn) = &result {
                writeln!(out, "{}", render_turn(turn))?;
            }
            result
        };
        if let Err(e) = result {
            tracing::warn!(session = %session.id().short(), "query failed: {e}");
            writeln!(out, "{}", error_message(&e))?;
        }
    }

    writeln!(out, "👋")?;
    Ok(())
}

/// Prompt until the gate opens. Returns `false` if input ended first.
async fn unlock<R, W>(
    session: &mut ChatSession,
    ui: &UiConfig,
    lines: &mut Lines<R>,
    out: &mut W,
) -> catalog_common::Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    while !session.is_unlocked() {
        write!(out, "{}: ", ui.password_prompt)?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            return Ok(false);
        };
        // Only the line terminator is stripped; the gate compares exactly.
        session.submit_password(line);
        if let Err(e) = session.gate().ensure_unlocked() {
            writeln!(out, "{}", error_message(&e))?;
        }
    }
    Ok(true)
}

/// Write chunks as they arrive while the request is in flight. A stream
/// that fails after printing text is marked as interrupted, since the
/// partial answer never reaches the transcript.
async fn ask_streaming<W: Write>(
    assistant: &CatalogAssistant,
    session: &mut ChatSession,
    prompt: String,
    out: &mut W,
) -> catalog_common::Result<Result<Turn, ChatError>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let sink = Box::new(move |chunk: String| {
        let _ = tx.send(chunk);
    });

    let mut started = false;
    let ask = assistant.ask_streaming(session, prompt, sink);
    tokio::pin!(ask);
    let result = loop {
        tokio::select! {
            biased;
            Some(chunk) = rx.recv() => {
                write_chunk(out, &chunk, &mut started)?;
                out.flush()?;
            }
            result = &mut ask => break result,
        }
    };
    while let Ok(chunk) = rx.try_recv() {
        write_chunk(out, &chunk, &mut started)?;
    }

    match (&result, started) {
        (Ok(turn), false) => writeln!(out, "{}", render_turn(turn))?,
        (Ok(_), true) => writeln!(out)?,
        (Err(_), true) => writeln!(out, "\n{INTERRUPTED_NOTICE}")?,
        (Err(_), false) => {}
    }
    Ok(result)
}

fn write_chunk<W: Write>(out: &mut W, chunk: &str, started: &mut bool) -> std::io::Result<()> {
    if !*started {
        write!(out, "🤖 Agente: ")?;
        *started = true;
    }
    write!(out, "{chunk}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use catalog_ai::{
        AiError, AiResponse, AnswerRequest, ChunkSink, DocumentHandle, DocumentSource,
        GenerationSettings, ModelService,
    };
    use catalog_common::Credentials;

    const PASSWORD: &str = "redfil123";

    /// Answers by echoing the prompt. With `cut_stream`, a streamed answer
    /// stops with a network error after its first chunk.
    struct EchoService {
        uploads: AtomicUsize,
        cut_stream: bool,
    }

    impl EchoService {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                uploads: AtomicUsize::new(0),
                cut_stream: false,
            })
        }

        fn cutting_stream() -> Arc<Self> {
            Arc::new(Self {
                uploads: AtomicUsize::new(0),
                cut_stream: true,
            })
        }
    }

    #[async_trait]
    impl ModelService for EchoService {
        async fn upload_document(
            &self,
            source: &DocumentSource,
        ) -> Result<DocumentHandle, AiError> {
            self.uploads.fetch_add(1, Ordering::SeqCst);
            Ok(DocumentHandle::new(
                "files/test",
                "https://example.invalid/files/test",
                source.mime_type.clone(),
            ))
        }

        async fn generate_answer(
            &self,
            request: &AnswerRequest<'_>,
        ) -> Result<AiResponse, AiError> {
            Ok(AiResponse {
                content: format!("Respuesta a: {}", request.prompt),
                ..Default::default()
            })
        }

        async fn generate_answer_streaming(
            &self,
            request: &AnswerRequest<'_>,
            on_chunk: ChunkSink,
        ) -> Result<AiResponse, AiError> {
            if self.cut_stream {
                on_chunk("El filtro es AP-".to_string());
                return Err(AiError::NetworkError("connection reset".into()));
            }
            on_chunk("Respuesta ".to_string());
            on_chunk(format!("a: {}", request.prompt));
            Ok(AiResponse {
                content: format!("Respuesta a: {}", request.prompt),
                ..Default::default()
            })
        }
    }

    fn settings() -> GenerationSettings {
        GenerationSettings {
            temperature: 0.2,
            top_p: 0.95,
            top_k: 64,
            max_output_tokens: 8192,
            system_instruction: "Responde solo con el catálogo.".into(),
        }
    }

    struct Run {
        out: String,
        session: ChatSession,
    }

    async fn drive_with(
        service: Arc<EchoService>,
        document: &std::path::Path,
        password: &str,
        stream: bool,
        input: &str,
    ) -> Run {
        let assistant = CatalogAssistant::new(
            service,
            DocumentSource::new(document, "application/pdf"),
            settings(),
        );
        let mut session = ChatSession::new(Arc::new(Credentials::new(password, "key")));
        let mut out = Vec::new();
        run(
            &assistant,
            &mut session,
            &UiConfig::default(),
            stream,
            input.as_bytes(),
            &mut out,
        )
        .await
        .unwrap();
        Run {
            out: String::from_utf8(out).unwrap(),
            session,
        }
    }

    async fn drive(service: Arc<EchoService>, stream: bool, input: &str) -> Run {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalogo.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        drive_with(service, &path, PASSWORD, stream, input).await
    }

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(error_message(&ChatError::WrongPassword), "😕 Clave incorrecta");
        let missing = ChatError::DocumentNotFound("CATALOGO.pdf".into());
        assert!(error_message(&missing).contains("'CATALOGO.pdf'"));
        let failed = ChatError::QueryFailed(AiError::RateLimited);
        assert_eq!(error_message(&failed), "Error en la consulta: Rate limited");
        let upload = ChatError::UploadFailed(AiError::Timeout);
        assert!(error_message(&upload).starts_with("Error al cargar el catálogo"));
    }

    #[test]
    fn turns_render_with_role_tag() {
        assert_eq!(render_turn(&Turn::user("hola")), "🧑 Tú: hola");
        assert_eq!(render_turn(&Turn::assistant("AP-1")), "🤖 Agente: AP-1");
    }

    #[tokio::test]
    async fn wrong_password_then_eof_never_unlocks() {
        let service = EchoService::new();
        let run = drive(service.clone(), false, "nope\n").await;
        assert!(run.out.contains("😕 Clave incorrecta"));
        assert!(!run.session.is_unlocked());
        assert!(run.session.history().is_empty());
        assert_eq!(service.uploads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn password_is_compared_without_trimming() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalogo.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let run = drive_with(EchoService::new(), &path, " pass word ", false, "pass word\n").await;
        assert!(!run.session.is_unlocked());

        let run = drive_with(
            EchoService::new(),
            &path,
            " pass word ",
            false,
            " pass word \r\n/salir\n",
        )
        .await;
        assert!(run.session.is_unlocked());
        assert!(!run.out.contains("😕 Clave incorrecta"));
    }

    #[tokio::test]
    async fn unlocked_session_answers_blocking() {
        let service = EchoService::new();
        let input = "nope\nredfil123\n¿Filtro Corsa?\n\n/historial\n/salir\n";
        let run = drive(service.clone(), false, input).await;
        assert!(run.out.contains("😕 Clave incorrecta"));
        assert!(run.out.contains("Agente Experto Redfil"));
        assert!(run.out.contains("Buscando en el catálogo..."));
        assert!(run.out.contains("🤖 Agente: Respuesta a: ¿Filtro Corsa?"));
        assert!(run.out.contains("🧑 Tú: ¿Filtro Corsa?"));
        assert_eq!(run.session.history().len(), 2);
        assert_eq!(service.uploads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn streaming_writes_chunks_in_order() {
        let run = drive(EchoService::new(), true, "redfil123\nAP-123\n/salir\n").await;
        assert!(run.out.contains("🤖 Agente: Respuesta a: AP-123\n"));
        assert_eq!(run.session.history()[1].text(), "Respuesta a: AP-123");
    }

    #[tokio::test]
    async fn interrupted_stream_is_marked_and_not_recorded() {
        let input = "redfil123\n¿Filtro Corsa?\n/historial\n/salir\n";
        let run = drive(EchoService::cutting_stream(), true, input).await;

        let partial = run.out.find("🤖 Agente: El filtro es AP-").unwrap();
        let notice = run.out.find(INTERRUPTED_NOTICE).unwrap();
        let error = run
            .out
            .find("Error en la consulta: Network error: connection reset")
            .unwrap();
        assert!(partial < notice && notice < error);

        assert_eq!(run.session.history().len(), 1);
        assert_eq!(run.session.history()[0].role(), Role::User);
        let listing = &run.out[error..];
        assert!(listing.contains("🧑 Tú: ¿Filtro Corsa?"));
        assert!(!listing.contains("🤖 Agente:"));
    }

    #[tokio::test]
    async fn missing_document_shows_warning_and_keeps_transcript_empty() {
        let dir = tempfile::tempdir().unwrap();
        let service = EchoService::new();
        let run = drive_with(
            service.clone(),
            &dir.path().join("missing.pdf"),
            PASSWORD,
            false,
            "redfil123\n¿Hola?\n",
        )
        .await;
        assert!(run.out.contains("⚠️ No se encontró el archivo"));
        assert!(run.session.history().is_empty());
        assert_eq!(service.uploads.load(Ordering::SeqCst), 0);
    }
}
