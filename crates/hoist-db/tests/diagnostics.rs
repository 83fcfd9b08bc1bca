use hoist_db::{File, RootDatabase, check_file};

/// A `//~ ERROR message` comment expects a diagnostic on its own line whose
/// message contains `message`.
#[derive(Debug)]
struct Annotation {
    line: usize,
    message: String,
}

fn annotations(fixture: &str) -> Vec<Annotation> {
    fixture
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let (_, comment) = line.split_once("//~")?;
            let message = comment.trim().trim_start_matches("ERROR").trim();
            (!message.is_empty()).then(|| Annotation { line: idx + 1, message: message.to_owned() })
        })
        .collect()
}

#[track_caller]
fn check(fixture: &str) {
    let db = RootDatabase::default();
    let file = File::new(&db, "check.cs".into(), fixture.to_owned());
    let line_index = file.line_index(&db);

    let mut reported = check_file(&db, file)
        .iter()
        .map(|diagnostic| Annotation {
            line: line_index.line_col(diagnostic.range().start()).line as usize + 1,
            message: diagnostic.message().to_owned(),
        })
        .collect::<Vec<_>>();

    for expected in annotations(fixture) {
        let found = reported.iter().position(|actual| {
            actual.line == expected.line && actual.message.contains(&expected.message)
        });
        let Some(pos) = found else {
            panic!("missing {expected:?}\nreported: {reported:#?}");
        };
        reported.remove(pos);
    }

    assert!(reported.is_empty(), "unexpected diagnostics:\n{reported:#?}");
}

#[test]
fn clean_hierarchy() {
    check(
        r#"
namespace Zoo
{
    public class Animal
    {
        protected string name;
    }

    public class Dog : Animal
    {
        private int legs = 4;
        public int Legs { get { return legs; } }

        public Dog(string name) : base() { this.name = name; }
    }
}
"#,
    );
}

#[test]
fn missing_semicolon() {
    check(
        r#"
class A
{
    int x //~ ERROR expected `;`
}
"#,
    );
}

#[test]
fn unexpected_member() {
    check(
        r#"
class A
{
    int this[int i] { get { return i; } } //~ ERROR expected member name
    int y;
}
"#,
    );
}

#[test]
fn duplicate_members() {
    check(
        r#"
class A
{
    int x;
    string x; //~ ERROR `A` already contains a definition for `x`
    void M() { }
    void M(int a) { }
}
"#,
    );
}

#[test]
fn circular_bases() {
    check(
        r#"
class A : B { } //~ ERROR circular base class dependency involving `A`
class B : A { } //~ ERROR circular base class dependency involving `B`
"#,
    );
}

#[test]
fn diagnostics_follow_edits() {
    use salsa::Setter as _;

    let mut db = RootDatabase::default();
    let file = File::new(&db, "edit.cs".into(), "class A { int x }".to_owned());
    assert_eq!(check_file(&db, file).len(), 1);

    file.set_text(&mut db).to("class A { int x; }".to_owned());
    assert!(check_file(&db, file).is_empty());
}
