//! End-to-end tests for cmdtree
//!
//! Drives a manager through its public API the way a host would: assemble a
//! tree, dispatch lines from different requesters, and complete partial input.

use std::sync::{Arc, Mutex};

use cmdtree::commands::{AboutCommand, HelpCommand};
use cmdtree::config::{Config, ConsoleUser};
use cmdtree::{
    tokenize, tokenize_partial, CommandManager, CommandNode, DispatchOutcome, ErrorReporter,
    FnCommand, ManagerInfo, OnlineRoster, Rejection, RejectionKind, Reply, Requester,
};

// ============================================================================
// Fixtures
// ============================================================================

struct Member {
    name: &'static str,
    admin: bool,
}

impl Requester for Member {
    fn name(&self) -> &str {
        self.name
    }

    fn has_permission(&self, _permission: &str) -> bool {
        self.admin
    }
}

const ALICE: Member = Member {
    name: "alice",
    admin: true,
};
const BOB: Member = Member {
    name: "bob",
    admin: false,
};

#[derive(Clone, Default)]
struct Inbox {
    seen: Arc<Mutex<Vec<(String, Rejection)>>>,
}

impl ErrorReporter<Member> for Inbox {
    fn report(&self, requester: &Member, rejection: &Rejection) {
        self.seen
            .lock()
            .unwrap()
            .push((requester.name.to_string(), rejection.clone()));
    }
}

fn echo(ctx: &cmdtree::Invocation<'_, Member>) -> Reply {
    Reply::accept(ctx.result.arguments().join(" "))
}

/// A small server-style tree:
/// - `give <player> <number>`
/// - `tp <player> [<player>]`
/// - `warp set <name>` / `warp list` (`warp` takes `[list|%name%]` too)
/// - `say ...` overflow
/// - `ban <player>` admin only
/// - `help`, `about`
fn server(roster: Arc<OnlineRoster>, inbox: Inbox) -> CommandManager<Member> {
    let info = ManagerInfo {
        name: "Server".to_string(),
        label: "srv".to_string(),
        description: "Test server".to_string(),
        version: "1.2.3".to_string(),
        authors: vec!["ops".to_string()],
        ..ManagerInfo::default()
    };

    let mut manager = CommandManager::new(info, roster).with_reporter(inbox);
    manager
        .add_command(
            CommandNode::handler("give", echo)
                .info("Give items")
                .slot(["%player%"])
                .slot(["%number%"]),
        )
        .add_command(
            CommandNode::handler("tp", echo)
                .alias("teleport")
                .slot(["%player%"])
                .slot(["%player%"]),
        )
        .add_command(
            CommandNode::handler("warp", echo)
                .slot(["set", "list", "%name%"])
                .child(CommandNode::handler("set", echo).slot(["%name%"]))
                .child(CommandNode::handler("list", |_| Reply::accept("spawn, home"))),
        )
        .add_command(CommandNode::handler("say", echo).overflow(true))
        .add_command(CommandNode::new(
            "ban",
            FnCommand::new(echo).permission(|m: &Member| m.admin),
        )
        .slot(["%player%"]))
        .add_command(HelpCommand::new(3, 60).node())
        .add_command(AboutCommand.node());
    manager
}

fn setup() -> (CommandManager<Member>, Arc<OnlineRoster>, Inbox) {
    let roster = Arc::new(OnlineRoster::new());
    roster.join("Steve");
    roster.join("Alex");
    let inbox = Inbox::default();
    (server(roster.clone(), inbox.clone()), roster, inbox)
}

fn executed(outcome: DispatchOutcome) -> Reply {
    match outcome {
        DispatchOutcome::Executed(reply) => reply,
        other => panic!("expected execution, got {:?}", other),
    }
}

fn rejected(outcome: DispatchOutcome) -> Rejection {
    match outcome {
        DispatchOutcome::Invalid(rejection) => rejection,
        other => panic!("expected rejection, got {:?}", other),
    }
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_typed_arguments_dispatch() {
    let (manager, _, inbox) = setup();

    let reply = executed(manager.dispatch_line(&ALICE, "give steve 64"));
    assert_eq!(reply, Reply::accept("steve 64"));

    let rejection = rejected(manager.dispatch_line(&ALICE, "give steve lots"));
    assert_eq!(rejection.kind, RejectionKind::Usage);
    assert_eq!(rejection.accepted, tokenize("give steve"));
    assert_eq!(rejection.rejected, tokenize("lots"));

    let seen = inbox.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "alice");
}

#[test]
fn test_roster_changes_are_seen_live() {
    let (manager, roster, _) = setup();

    assert!(matches!(
        manager.dispatch_line(&ALICE, "tp herobrine"),
        DispatchOutcome::Invalid(_)
    ));
    roster.join("Herobrine");
    assert_eq!(
        executed(manager.dispatch_line(&ALICE, "teleport herobrine steve")),
        Reply::accept("herobrine steve")
    );
    roster.leave("steve");
    assert!(matches!(
        manager.dispatch_line(&ALICE, "tp herobrine steve"),
        DispatchOutcome::Invalid(_)
    ));
}

#[test]
fn test_subcommand_shadows_usage_literal() {
    let (manager, _, _) = setup();

    assert_eq!(
        executed(manager.dispatch_line(&ALICE, "warp list")),
        Reply::accept("spawn, home")
    );
    assert_eq!(
        executed(manager.dispatch_line(&ALICE, "warp set home")),
        Reply::accept("home")
    );
    // No child named `home`, so the wildcard slot takes it
    assert_eq!(
        executed(manager.dispatch_line(&ALICE, "warp home")),
        Reply::accept("home")
    );
}

#[test]
fn test_overflow_takes_everything() {
    let (manager, _, _) = setup();
    assert_eq!(
        executed(manager.dispatch_line(&BOB, "say hello there 42 %player%")),
        Reply::accept("hello there 42 %player%")
    );
}

#[test]
fn test_permission_hides_command() {
    let (manager, _, inbox) = setup();

    assert_eq!(
        executed(manager.dispatch_line(&ALICE, "ban Steve")),
        Reply::accept("Steve")
    );

    let rejection = rejected(manager.dispatch_line(&BOB, "ban Steve"));
    assert_eq!(rejection.kind, RejectionKind::UnknownCommand);
    assert!(rejection.accepted.is_empty());
    assert_eq!(inbox.seen.lock().unwrap()[0].0, "bob");

    assert!(manager.complete_line(&BOB, "ba").is_empty());
    assert_eq!(manager.complete_line(&ALICE, "ba"), vec!["ban"]);
}

#[test]
fn test_unknown_command_and_idle() {
    let (manager, _, _) = setup();

    let rejection = rejected(manager.dispatch_line(&ALICE, "fly now"));
    assert_eq!(rejection.kind, RejectionKind::UnknownCommand);
    assert_eq!(rejection.rejected, tokenize("fly now"));
    assert_eq!(
        rejection.to_string(),
        "incorrect argument for command:  >>fly now<<"
    );

    assert_eq!(manager.dispatch_line(&ALICE, "   "), DispatchOutcome::Idle);
}

#[test]
fn test_default_command_runs_on_empty_input() {
    let (mut manager, _, _) = setup();
    manager.set_default(AboutCommand.node());

    let reply = executed(manager.dispatch(&BOB, &[]));
    assert!(reply.text.starts_with("[Server - About]"));
    assert!(reply.text.contains(" Version: 1.2.3"));
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_help_pages_follow_permissions() {
    let (manager, _, _) = setup();

    // alice sees 7 commands over 3 pages, bob 6 over 2
    let page = executed(manager.dispatch_line(&ALICE, "help 2")).text;
    assert!(page.contains(" /srv ban"));
    assert!(page.contains(" /srv help: Shows all available commands."));
    assert!(page.contains("Page 2 of 3 - Previous / Next page"));

    let page = executed(manager.dispatch_line(&ALICE, "help 3")).text;
    assert!(page.contains(" /srv about: Shows more details about the plugin."));
    assert!(page.contains("Page 3 of 3 - Previous page"));

    let page = executed(manager.dispatch_line(&BOB, "? 9")).text;
    assert!(page.contains("Page 2 of 2 - Previous page"));
    assert!(!page.contains(" /srv ban"));

    let page = executed(manager.dispatch_line(&BOB, "help")).text;
    assert!(page.starts_with("[Server - Help]\nTest server\n\n"));
    assert!(page.contains(" /srv give: Give items"));
    assert!(page.contains("Page 1 of 2 - Next page"));
}

#[test]
fn test_help_detail() {
    let (manager, _, _) = setup();

    let detail = executed(manager.dispatch_line(&ALICE, "help tp")).text;
    assert!(detail.contains(" Aliases: teleport"));
    assert!(detail.contains("Usage of /srv tp <argument 1> <argument 2>:"));
    assert!(detail.contains("   Argument 1: <player>"));

    let detail = executed(manager.dispatch_line(&ALICE, "help warp")).text;
    assert!(detail.contains("   Sub commands: set, list"));

    // bob may not see ban, so help declines
    let reply = executed(manager.dispatch_line(&BOB, "help ban"));
    assert!(!reply.accepted);
}

// ============================================================================
// Completion
// ============================================================================

#[test]
fn test_complete_top_level() {
    let (manager, _, _) = setup();

    assert_eq!(
        manager.complete_line(&BOB, ""),
        vec!["give", "tp", "warp", "say", "help", "about"]
    );
    assert_eq!(manager.complete_line(&BOB, "A"), vec!["warp", "say", "about"]);
}

#[test]
fn test_complete_arguments() {
    let (manager, _, _) = setup();

    // first slot of give is %player%, expanded from the roster
    assert_eq!(manager.complete_line(&ALICE, "give "), vec!["Alex", "Steve"]);
    // second slot is %number%, not enumerable
    assert!(manager.complete_line(&ALICE, "give steve ").is_empty());
    // past the declared usage
    assert!(manager.complete_line(&ALICE, "give steve 1 ").is_empty());

    // children first, then first-slot literals, deduplicated
    assert_eq!(manager.complete_line(&ALICE, "warp "), vec!["set", "list"]);
    assert_eq!(manager.complete_line(&ALICE, "warp S"), vec!["set", "list"]);

    assert_eq!(manager.complete_line(&ALICE, "tp steve st"), vec!["Steve"]);
    assert!(manager.complete_line(&ALICE, "tp nobody ").is_empty());
}

#[test]
fn test_complete_help_lists_commands() {
    let (manager, _, _) = setup();
    assert_eq!(manager.complete_line(&BOB, "help g"), vec!["give"]);
}

#[test]
fn test_completions_dispatch() {
    let (manager, _, _) = setup();

    for line in ["", "give ", "warp ", "tp steve ", "help "] {
        let tokens = tokenize_partial(line);
        let context = &tokens[..tokens.len() - 1];
        for candidate in manager.complete(&ALICE, &tokens) {
            let mut full = context.to_vec();
            full.push(candidate.clone());
            assert!(
                manager.resolve(&ALICE, &full).is_dispatchable(),
                "{:?} + {:?} should dispatch",
                context,
                candidate
            );
        }
    }
}

// ============================================================================
// Config-built manager
// ============================================================================

#[test]
fn test_config_assembled_manager() {
    let config: Config = toml::from_str(
        r#"
default = "help"

[manager]
name = "Guild"
label = "g"

[console]
name = "keeper"
permissions = ["guild.manage"]

[[commands]]
name = "guild"
info = "Guild tools"

[[commands.children]]
name = "invite"
usage = [["%player%"]]
permission = "guild.manage"
reply = "{sender} invited {args}"

[[commands.children]]
name = "roll"
usage = [["%number%"], ["%decimal%"]]
reply = "rolled {args}"
"#,
    )
    .unwrap();

    let roster = Arc::new(OnlineRoster::new());
    roster.join("Steve");
    let manager: CommandManager<ConsoleUser> = config.build_manager(roster).unwrap();
    let keeper = config.console.clone();
    let guest = ConsoleUser {
        name: "guest".to_string(),
        permissions: Vec::new(),
    };

    assert_eq!(
        executed(manager.dispatch_line(&keeper, "guild invite steve")),
        Reply::accept("keeper invited steve")
    );
    assert!(matches!(
        manager.dispatch_line(&guest, "guild invite steve"),
        DispatchOutcome::Invalid(_)
    ));
    assert_eq!(
        executed(manager.dispatch_line(&guest, "guild roll 2 0.5")),
        Reply::accept("rolled 2 0.5")
    );

    assert_eq!(manager.complete_line(&keeper, "guild "), vec!["invite", "roll"]);
    assert_eq!(manager.complete_line(&guest, "guild "), vec!["roll"]);

    let help = executed(manager.dispatch(&guest, &[])).text;
    assert!(help.starts_with("[Guild - Help]"));
    assert!(help.contains(" /g guild: Guild tools"));
}
