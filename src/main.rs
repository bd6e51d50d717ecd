mod chat;
mod config;
mod quiz;

use std::sync::Arc;

use chat::{keyboard_markup, send_view, ChatView, RESTART};
use config::Settings;
use dotenv::dotenv;
use log::{debug, error, info};
use quiz::{
    session::{AdvanceOutcome, GameSession},
    source::JsonFileSource,
};
use teloxide::{
    dispatching::dialogue::InMemStorage,
    prelude::*,
    types::KeyboardMarkup,
};

type TriviaDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Clone, Default)]
pub enum State {
    #[default]
    Start,
    ReceivePlayerCount,
    ReceivePlayerNames {
        count: usize,
        names: Vec<String>,
    },
    Playing {
        session: GameSession,
        view: ChatView,
    },
    Finished {
        session: GameSession,
        view: ChatView,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine, the variables may come from the environment.
    dotenv().ok();

    pretty_env_logger::init();
    log::info!("Starting trivia bot...");

    let settings = Arc::new(Settings::from_env()?);
    let source = Arc::new(JsonFileSource::new(settings.questions_path.clone()));
    info!(
        "Questions from {}, {} per game, up to {} players",
        source.path().display(),
        settings.question_count,
        settings.max_players
    );

    let bot = Bot::from_env();

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::ReceivePlayerCount].endpoint(receive_player_count))
            .branch(
                dptree::case![State::ReceivePlayerNames { count, names }]
                    .endpoint(receive_player_names),
            )
            .branch(dptree::case![State::Playing { session, view }].endpoint(playing))
            .branch(dptree::case![State::Finished { session, view }].endpoint(finished)),
    )
    .dependencies(dptree::deps![InMemStorage::<State>::new(), settings, source])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;

    Ok(())
}

const GREETING_TEXT: &str = "Hi! I'm the trivia bot. Take turns answering questions and see who knows the most!";
const SKIP: &str = "Skip";

fn player_count_keyboard(max_players: usize) -> KeyboardMarkup {
    keyboard_markup(vec![(1..=max_players).map(|n| n.to_string()).collect()])
}

async fn ask_player_count(bot: &Bot, chat_id: ChatId, settings: &Settings) -> HandlerResult {
    bot.send_message(chat_id, "How many players?")
        .reply_markup(player_count_keyboard(settings.max_players))
        .await?;
    Ok(())
}

async fn ask_player_name(bot: &Bot, chat_id: ChatId, index: usize) -> HandlerResult {
    bot.send_message(
        chat_id,
        format!("Name of player {}? (Skip to use \"Player {}\")", index + 1, index + 1),
    )
    .reply_markup(keyboard_markup(vec![vec![SKIP.to_string()]]))
    .await?;
    Ok(())
}

async fn start(
    bot: Bot,
    dialogue: TriviaDialogue,
    msg: Message,
    settings: Arc<Settings>,
) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;
    ask_player_count(&bot, msg.chat.id, &settings).await?;

    dialogue.update(State::ReceivePlayerCount).await?;
    Ok(())
}

async fn receive_player_count(
    bot: Bot,
    dialogue: TriviaDialogue,
    msg: Message,
    settings: Arc<Settings>,
) -> HandlerResult {
    let count = msg
        .text()
        .and_then(|text| text.trim().parse::<usize>().ok())
        .filter(|n| (1..=settings.max_players).contains(n));

    let Some(count) = count else {
        bot.send_message(
            msg.chat.id,
            format!("Please choose a number from 1 to {}", settings.max_players),
        )
        .reply_markup(player_count_keyboard(settings.max_players))
        .await?;
        return Ok(());
    };

    ask_player_name(&bot, msg.chat.id, 0).await?;
    dialogue
        .update(State::ReceivePlayerNames {
            count,
            names: Vec::new(),
        })
        .await?;
    Ok(())
}

async fn receive_player_names(
    bot: Bot,
    dialogue: TriviaDialogue,
    (count, mut names): (usize, Vec<String>),
    msg: Message,
    settings: Arc<Settings>,
    source: Arc<JsonFileSource>,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        bot.send_message(msg.chat.id, "Please send the name as text")
            .await?;
        return Ok(());
    };
    names.push(if text == SKIP { String::new() } else { text.to_string() });

    if names.len() < count {
        ask_player_name(&bot, msg.chat.id, names.len()).await?;
        dialogue.update(State::ReceivePlayerNames { count, names }).await?;
        return Ok(());
    }

    let players = quiz::build_roster(count, &names);
    let mut view = ChatView::default();
    let started = {
        let mut rng = rand::thread_rng();
        GameSession::start(
            players,
            source.as_ref(),
            settings.question_count,
            &mut rng,
            &mut view,
        )
    };

    match started {
        Ok(session) => {
            info!(
                "Chat {}: game started with {} players and {} questions",
                msg.chat.id.0,
                session.players().len(),
                session.questions().len()
            );
            send_view(&bot, msg.chat.id, &mut view).await?;
            dialogue.update(State::Playing { session, view }).await?;
        }
        Err(err) => {
            // Nothing is shown in the chat, the next message starts setup over.
            error!("Error fetching questions: {}", err);
            dialogue.update(State::Start).await?;
        }
    }
    Ok(())
}

async fn playing(
    bot: Bot,
    dialogue: TriviaDialogue,
    (mut session, mut view): (GameSession, ChatView),
    msg: Message,
) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    if view.is_advance(text) {
        match session.press_advance(&mut view) {
            AdvanceOutcome::Ignored => return Ok(()),
            AdvanceOutcome::Finished(summary) => {
                info!(
                    "Chat {}: {} ({:.0}%)",
                    msg.chat.id.0,
                    summary.headline(),
                    summary.percentage()
                );
                send_view(&bot, msg.chat.id, &mut view).await?;
                dialogue.update(State::Finished { session, view }).await?;
                return Ok(());
            }
            outcome => debug!("Chat {}: {:?}", msg.chat.id.0, outcome),
        }
    } else if let Some(choice) = view.option_at(text) {
        // Taps after the reveal are ignored by the session.
        if !session.select_answer(choice, &mut view) {
            return Ok(());
        }
    } else {
        bot.send_message(msg.chat.id, "Please pick one of the options")
            .await?;
        return Ok(());
    }

    send_view(&bot, msg.chat.id, &mut view).await?;
    dialogue.update(State::Playing { session, view }).await?;
    Ok(())
}

async fn finished(
    bot: Bot,
    dialogue: TriviaDialogue,
    (session, mut view): (GameSession, ChatView),
    msg: Message,
    settings: Arc<Settings>,
) -> HandlerResult {
    if msg.text() != Some(RESTART) {
        bot.send_message(msg.chat.id, format!("Tap {} to play again", RESTART))
            .reply_markup(keyboard_markup(view.keyboard()))
            .await?;
        return Ok(());
    }

    session.restart(&mut view);
    bot.send_message(msg.chat.id, view.text()).await?;
    ask_player_count(&bot, msg.chat.id, &settings).await?;
    dialogue.update(State::ReceivePlayerCount).await?;
    Ok(())
}
