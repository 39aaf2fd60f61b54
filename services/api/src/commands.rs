use statements::workflows::statement::StatementError;

/// The bot command grammar users type into the chat surface. One string in,
/// one discrete command event out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BotCommand {
    Start,
    Get { ticket: String },
    GetWithoutTicket,
    Latest,
    Unknown,
}

pub(crate) fn parse(text: &str) -> BotCommand {
    let mut parts = text.split_whitespace();
    match parts.next() {
        Some("/start") => BotCommand::Start,
        Some("/get") => match parts.next() {
            Some(ticket) => BotCommand::Get {
                ticket: ticket.to_string(),
            },
            None => BotCommand::GetWithoutTicket,
        },
        Some("/last") => BotCommand::Latest,
        _ => BotCommand::Unknown,
    }
}

pub(crate) const START_REPLY: &str = "Здравствуйте! Напишите /get и номер студенческого билета чтобы получить заявление. Пример: /get 000892";

pub(crate) const MISSING_TICKET_REPLY: &str =
    "Пожалуйста, укажите номер студенческого билета. Пример: /get 000892";

/// One user-visible message per error kind; internal detail stays in the
/// logs, never in the chat.
pub(crate) fn user_message(error: &StatementError) -> String {
    match error {
        StatementError::NotFound { ticket } => format!(
            "Заявление с номером студенческого билета {ticket} не найдено."
        ),
        StatementError::NoSubmissions => "Нет данных в ответе от формы!".to_string(),
        StatementError::Transport(_) | StatementError::Disk(_) => {
            "Не удалось получить данные из формы.".to_string()
        }
        StatementError::MissingField { .. } => {
            "Не удалось извлечь необходимые данные".to_string()
        }
        StatementError::Period(_) => "Не удалось разобрать период отсутствия.".to_string(),
        StatementError::Document(_) => "Не удалось подготовить документ.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statements::workflows::statement::{FormsError, PeriodError};

    #[test]
    fn parses_the_known_command_grammar() {
        assert_eq!(parse("/start"), BotCommand::Start);
        assert_eq!(
            parse("/get 000892"),
            BotCommand::Get {
                ticket: "000892".to_string()
            }
        );
        assert_eq!(parse("  /get   000892  "), BotCommand::Get {
            ticket: "000892".to_string()
        });
        assert_eq!(parse("/get"), BotCommand::GetWithoutTicket);
        assert_eq!(parse("/last"), BotCommand::Latest);
        assert_eq!(parse("hello"), BotCommand::Unknown);
        assert_eq!(parse(""), BotCommand::Unknown);
    }

    #[test]
    fn every_error_kind_has_one_user_message() {
        let not_found = StatementError::NotFound {
            ticket: "000892".to_string(),
        };
        assert!(user_message(&not_found).contains("000892"));

        let transport = StatementError::Transport(FormsError::Status { status: 502 });
        assert_eq!(user_message(&transport), "Не удалось получить данные из формы.");

        let period = StatementError::Period(PeriodError::Missing);
        assert_eq!(
            user_message(&period),
            "Не удалось разобрать период отсутствия."
        );
    }
}
