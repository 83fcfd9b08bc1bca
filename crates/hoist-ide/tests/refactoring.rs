use hoist_ide::{Analysis, CancellationToken, FileRange};
use hoist_inputs::File;
use salsa::Setter as _;
use text_size::{TextRange, TextSize};

const SHAPES: &str = r#"using System;

namespace Shapes
{
    public abstract class Shape
    {
        public abstract double Area();
    }

    public class Circle : Shape
    {
        private readonly double radius;
        public double Radius { get { return radius; } }

        public Circle(double radius) : base()
        {
            this.radius = radius;
        }

        public override double Area() => 3.14 * radius * radius;
    }
}
"#;

fn offset_of(text: &str, needle: &str) -> TextSize {
    TextSize::new(text.find(needle).unwrap() as u32)
}

fn refactor(analysis: &mut Analysis, file: File, offset: TextSize) -> String {
    let change = {
        let offer = analysis
            .offer_refactoring(FileRange { file, range: TextRange::empty(offset) })
            .expect("refactoring not offered");
        offer.compute_edit(&CancellationToken::new()).unwrap()
    };

    let mut text = file.text(analysis.db()).to_owned();
    change.edit.apply(&mut text);
    file.set_text(analysis.db_mut()).to(text.clone());
    text
}

#[test]
fn result_is_still_well_formed() {
    let mut analysis = Analysis::default();
    let file = File::new(analysis.db(), "shapes.cs".into(), SHAPES.to_owned());
    assert!(analysis.diagnostics(file).is_empty());

    let after = refactor(&mut analysis, file, offset_of(SHAPES, "radius;"));

    assert!(analysis.diagnostics(file).is_empty());
    assert!(after.contains(
        "    public abstract class Shape\n    {\n        protected readonly double radius;\n"
    ));
    assert!(after.contains(
        "        public abstract double Area();\n        public double Radius { get { return radius; } }\n    }"
    ));
    assert!(after.contains("    public class Circle : Shape\n    {\n\n        public Circle"));
}

#[test]
fn moving_twice_up_a_hierarchy() {
    let text = "class A { }\nclass B : A { }\nclass C : B { public int x; }\n";
    let mut analysis = Analysis::default();
    let file = File::new(analysis.db(), "chain.cs".into(), text.to_owned());

    let after = refactor(&mut analysis, file, offset_of(text, "x;"));
    assert_eq!(after, "class A { }\nclass B : A { protected int x; }\nclass C : B { }\n");

    let after = refactor(&mut analysis, file, offset_of(&after, "x;"));
    assert_eq!(after, "class A { protected int x; }\nclass B : A { }\nclass C : B { }\n");
}

#[test]
fn offers_follow_edits() {
    let mut analysis = Analysis::default();
    let file = File::new(analysis.db(), "a.cs".into(), "class A { int x; }".to_owned());
    let range = FileRange { file, range: TextRange::empty(14.into()) };
    assert!(analysis.offer_refactoring(range).is_none());

    file.set_text(analysis.db_mut()).to("class A : B { int x; } class B { }".to_owned());
    let range = FileRange { file, range: TextRange::empty(18.into()) };
    let offer = analysis.offer_refactoring(range).unwrap();
    assert_eq!(offer.target(), TextRange::new(14.into(), 20.into()));
}
