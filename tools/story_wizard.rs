/// Story Wizard: interactive shell that walks the five wizard steps.
///
/// Usage: story_wizard [--templates <path>] [--catalog <path>] [--seed <n>]
///
/// Commands:
///   name <text>            step 1, main character name
///   themes / theme <id>    step 2, list or pick a theme
///   morals / moral <id>    step 3, list or toggle a moral value
///   length, friends, friend <id>, add <name>, <role>, items, item <id>,
///   extra <a, b, c>, sound <on|off>, tts <on|off>
///                          step 4, options
///   next                   leave the moral or options step
///   generate               step 5, assemble and show the story
///   back, status, seed <n>, help, quit

use masal_engine::core::assembler::StoryAssembler;
use masal_engine::core::catalog::Catalog;
use masal_engine::core::format::Block;
use masal_engine::core::session::StorySession;
use masal_engine::core::summary::StorySummary;
use masal_engine::core::wizard::{Selection, StoryOptions, WizardState, WizardStep};
use masal_engine::schema::config::StoryLength;
use masal_engine::schema::moral::MoralValue;
use masal_engine::telemetry;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use std::path::Path;

fn main() {
    telemetry::init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let mut templates_path = None;
    let mut catalog_path = None;
    let mut seed: u64 = 42;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--templates" if i + 1 < args.len() => {
                i += 1;
                templates_path = Some(args[i].clone());
            }
            "--catalog" if i + 1 < args.len() => {
                i += 1;
                catalog_path = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let catalog = match catalog_path {
        Some(ref path) => Catalog::load_from_ron(Path::new(path)),
        None => Catalog::builtin(),
    };
    let catalog = match catalog {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: Failed to load catalog: {}", e);
            std::process::exit(1);
        }
    };

    let mut assembler = match build_assembler(templates_path.as_deref(), seed) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "Loaded {} themes, {} moral values, {} items",
        catalog.themes.len(),
        catalog.moral_values.len(),
        catalog.items.len()
    );
    println!("Seed: {}", seed);
    println!("Type 'help' for commands.\n");

    // Session state
    let mut state = WizardState::default();
    let mut morals: Selection<MoralValue> = Selection::new();
    let mut options = StoryOptions::default();
    let mut session = StorySession::new();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut current_seed = seed;

    print_step(&state);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("wizard> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (line.to_lowercase(), ""),
        };

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Hoşça kal.");
                break;
            }
            "help" | "h" | "?" => print_help(),
            "status" => print_step(&state),
            "seed" => match rest.parse::<u64>() {
                Ok(s) => match build_assembler(templates_path.as_deref(), s) {
                    Ok(a) => {
                        assembler = a;
                        rng = StdRng::seed_from_u64(s);
                        current_seed = s;
                        println!("Seed set to {}", current_seed);
                    }
                    Err(e) => println!("ERROR: {}", e),
                },
                Err(_) => println!("Current seed: {}", current_seed),
            },
            "back" => {
                session.cancel();
                state = state.back();
                print_step(&state);
            }
            "name" => {
                let WizardState::Draft(draft) = &state else {
                    println!("The character is already chosen. Use 'back' to change it.");
                    continue;
                };
                match draft.choose_character(rest) {
                    Ok(chosen) => {
                        state = WizardState::Character(chosen);
                        print_step(&state);
                    }
                    Err(e) => println!("{}", e.prompt()),
                }
            }
            "themes" => {
                for theme in &catalog.themes {
                    println!("  [{}] {}: {}", theme.id, theme.title, theme.description);
                }
            }
            "theme" => {
                let WizardState::Character(chosen) = &state else {
                    println!("Not at the theme step.");
                    continue;
                };
                match chosen.choose_theme(catalog.theme_by_id(rest)) {
                    Ok(next) => {
                        state = WizardState::Theme(next);
                        print_step(&state);
                    }
                    Err(e) => println!("{}", e.prompt()),
                }
            }
            "morals" => {
                for value in &catalog.moral_values {
                    let mark = if morals.contains(&value.id) { "x" } else { " " };
                    println!("  [{}] ({}) {}", mark, value.id, value.title);
                }
            }
            "moral" => match catalog.moral_by_id(rest) {
                Some(value) => {
                    let selected = morals.toggle(value);
                    println!(
                        "{} {}",
                        if selected { "Selected" } else { "Removed" },
                        value.title
                    );
                }
                None => println!("Unknown moral value: {}", rest),
            },
            "length" => {
                options.length = StoryLength::parse(rest);
                println!("Length: {}", options.length.label());
            }
            "friends" => {
                for c in catalog.supporting_characters() {
                    let mark = if options.supporting.contains(&c.id) { "x" } else { " " };
                    println!("  [{}] ({}) {}, {}", mark, c.id, c.name, c.role());
                }
                println!("  Roles: {}", catalog.roles.join(", "));
            }
            "friend" => match catalog.character_by_id(rest).filter(|c| !c.is_main()) {
                Some(c) => {
                    options.supporting.toggle(c);
                }
                None => println!("Unknown supporting character: {}", rest),
            },
            "add" => {
                let (name, role) = rest.split_once(',').unwrap_or((rest, "Arkadaş"));
                match options.add_supporting(name, role.trim()) {
                    Ok(c) => println!("Added {} ({})", c.name, c.role()),
                    Err(e) => println!("{}", e.prompt()),
                }
            }
            "items" => {
                for item in &catalog.items {
                    let mark = if options.items.contains(&item.id) { "x" } else { " " };
                    println!("  [{}] ({}) {}", mark, item.id, item.name);
                }
            }
            "item" => match catalog.item_by_id(rest) {
                Some(item) => {
                    options.items.toggle(item);
                }
                None => println!("Unknown item: {}", rest),
            },
            "extra" => options.free_text = rest.to_string(),
            "sound" => options.features.sound_effects = rest == "on",
            "tts" => options.features.narration = rest == "on",
            "next" => {
                let next = match &state {
                    WizardState::Theme(t) => t.choose_morals(&morals).map(WizardState::Morals),
                    WizardState::Morals(m) => m
                        .finish(&options, &mut rng)
                        .map(|config| WizardState::Ready {
                            morals: m.clone(),
                            config,
                        }),
                    _ => {
                        println!("Use the step's own command to continue.");
                        continue;
                    }
                };
                match next {
                    Ok(next) => {
                        state = next;
                        print_step(&state);
                    }
                    Err(e) => println!("{}", e.prompt()),
                }
            }
            "generate" => {
                let Some(config) = state.config() else {
                    println!("Finish the earlier steps first.");
                    continue;
                };
                match session.generate(&mut assembler, config) {
                    Some(story) => {
                        println!("\n--- Story ---");
                        for block in story.blocks() {
                            match block {
                                Block::Heading(text) => println!("\n== {} ==\n", text),
                                Block::Body(text) => println!("{}\n", text),
                            }
                        }
                        println!("--- End ---");
                        let defaulted = story.resolution.defaulted();
                        if !defaulted.is_empty() {
                            println!("Defaults used for: {}", defaulted.join(", "));
                        }
                        println!();
                    }
                    None => println!("No story was produced."),
                }
            }
            _ => println!("Unknown command: {}. Type 'help'.", cmd),
        }
    }
}

fn build_assembler(
    templates_path: Option<&str>,
    seed: u64,
) -> Result<StoryAssembler, masal_engine::core::assembler::AssemblyError> {
    let builder = StoryAssembler::builder().seed(seed);
    match templates_path {
        Some(path) => builder.templates_path(path).build(),
        None => builder.build(),
    }
}

fn print_step(state: &WizardState) {
    let current = state.step();
    let dots: Vec<String> = WizardStep::ALL
        .iter()
        .map(|step| {
            if step.index() < current.index() {
                format!("✓ {}", step.label())
            } else if *step == current {
                format!("● {}", step.label())
            } else {
                format!("○ {}", step.label())
            }
        })
        .collect();
    println!("{}", dots.join("  "));

    match state {
        WizardState::Draft(_) => println!("Hikayenin ana karakterinin adını giriniz: name <ad>"),
        WizardState::Character(c) => {
            println!("{} için bir tema seçin: themes, theme <id>", c.main_character().name)
        }
        WizardState::Theme(t) => println!(
            "Tema: {}. Ahlaki değer seçin: morals, moral <id>, next",
            t.theme().title
        ),
        WizardState::Morals(_) => {
            println!("Detaylar: length, friends, friend, add, items, item, extra, sound, tts, next")
        }
        WizardState::Ready { config, .. } => {
            println!("\n{}", StorySummary::from_config(config));
            println!("'generate' ile hikayeyi oluşturun.");
        }
    }
}

fn print_usage() {
    println!("Usage: story_wizard [--templates <path>] [--catalog <path>] [--seed <n>]");
}

fn print_help() {
    println!("Commands:");
    println!("  name <text>              Main character name");
    println!("  themes | theme <id>      List / pick a theme");
    println!("  morals | moral <id>      List / toggle a moral value");
    println!("  length <short|medium|long>");
    println!("  friends | friend <id>    List / toggle a catalog supporting character");
    println!("  add <name>, <role>       Add a supporting character by name");
    println!("  items | item <id>        List / toggle a catalog item");
    println!("  extra <a, b, c>          Your own items, comma separated");
    println!("  sound <on|off>           Sound effects");
    println!("  tts <on|off>             Narration");
    println!("  next                     Continue from the moral or options step");
    println!("  generate                 Assemble the story");
    println!("  back                     Previous step");
    println!("  status                   Show the current step");
    println!("  seed <n>                 Reset the random seed");
    println!("  quit                     Exit");
}
