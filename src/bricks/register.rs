use crate::bricks::factory::{BrickFactory, Constructor, Param, ParamValue, SymbolSpec, Tag};
use crate::bricks::{Brick, BrickArgs};
use crate::foundation::core::{Drawable, Point, SplineSegment, TextSpan};
use crate::foundation::error::UndulateResult;

// vertical pitch of attribute lines below a field
const ATTR_PITCH: f64 = 12.0;

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn labels(b: &mut Brick, args: &BrickArgs, data_x: f64) {
    let (w, h) = (b.width, b.height);
    b.texts.push(Drawable::new(
        "reg-pos",
        TextSpan::new(w * 0.5, h * 0.125, args.field.position.to_string()),
    ));
    b.texts.push(Drawable::new(
        "reg-data",
        TextSpan::new(data_x, h * 0.625, args.digital.data.clone()),
    ));
}

fn fill(b: &mut Brick, args: &BrickArgs, span: f64) {
    if args.field.style.is_empty() {
        return;
    }
    let h = b.height;
    b.polygons.push(Drawable::new(
        args.field.style.clone(),
        vec![p(span, h), p(0.0, h), p(0.0, h / 4.0), p(span, h / 4.0)],
    ));
}

fn attributes(b: &mut Brick, args: &BrickArgs) {
    let x = b.width * args.field.scale_width / 2.0;
    for (i, attr) in args.field.attributes.iter().enumerate() {
        b.texts.push(Drawable::new(
            "attr",
            TextSpan::new(x, b.height + ATTR_PITCH * (i + 1) as f64, attr.clone()),
        ));
    }
}

/// `[`: opening bit of a multi-bit field.
pub(crate) fn field_start(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let (w, h) = (b.width, b.height);
    let sw = args.field.scale_width;
    b.paths.push(Drawable::new(
        "path",
        vec![p(w, h), p(0.0, h), p(0.0, h / 4.0), p(w, h / 4.0)],
    ));
    fill(&mut b, args, w * sw);
    attributes(&mut b, args);
    let data_x = if args.field.splitted { w * 0.5 } else { w * 0.5 * sw };
    labels(&mut b, args, data_x);
    Ok(b)
}

/// `:`: inner bit of a multi-bit field.
pub(crate) fn field_mid(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let (w, h) = (b.width, b.height);
    b.splines.push(Drawable::new(
        "path",
        vec![
            SplineSegment::move_to(w, h * 0.875),
            SplineSegment::line_by(0.0, h * 0.125),
            SplineSegment::line_by(-w, 0.0),
            SplineSegment::line_by(0.0, -h * 0.125),
        ],
    ));
    b.splines.push(Drawable::new(
        "path",
        vec![
            SplineSegment::move_to(w, h * 0.375),
            SplineSegment::line_by(0.0, -h * 0.125),
            SplineSegment::line_by(-w, 0.0),
            SplineSegment::line_by(0.0, h * 0.125),
        ],
    ));
    b.texts.push(Drawable::new(
        "reg-data",
        TextSpan::new(w * 0.5, h * 0.625, args.digital.data.clone()),
    ));
    Ok(b)
}

/// `]`: closing bit of a multi-bit field.
pub(crate) fn field_end(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let (w, h) = (b.width, b.height);
    b.paths.push(Drawable::new(
        "path",
        vec![p(0.0, h), p(w, h), p(w, h / 4.0), p(0.0, h / 4.0)],
    ));
    labels(&mut b, args, w * 0.5);
    Ok(b)
}

/// `b`: single-bit field.
pub(crate) fn field_bit(symbol: char, args: &BrickArgs) -> UndulateResult<Brick> {
    let mut b = Brick::new(symbol, args);
    let (w, h) = (b.width, b.height);
    b.paths.push(Drawable::new(
        "path",
        vec![
            p(0.0, h / 4.0),
            p(0.0, h),
            p(w, h),
            p(w, h / 4.0),
            p(0.0, h / 4.0),
        ],
    ));
    fill(&mut b, args, w);
    attributes(&mut b, args);
    labels(&mut b, args, w * 0.5);
    Ok(b)
}

// `data` is consumed per bit, `position` by the bits printing one, the
// remaining field parameters once per field by its opening bit
pub(crate) fn register_symbols(factory: &mut BrickFactory) {
    let field = |ctor: Constructor, position: bool, opening: bool| {
        let mut spec = SymbolSpec::new(ctor)
            .tags(&[Tag::Register])
            .param(Param::Data, ParamValue::Text(String::new()))
            .param(Param::Period, ParamValue::Number(1.0));
        if position {
            spec = spec.param(Param::Position, ParamValue::Number(0.0));
        }
        if opening {
            spec = spec
                .param(Param::Style, ParamValue::Text(String::new()))
                .param(Param::Attribute, ParamValue::Texts(Vec::new()))
                .param(Param::ScaleWidth, ParamValue::Number(1.0));
        }
        spec
    };
    factory.register('[', field(field_start, true, true));
    factory.register(':', field(field_mid, false, false));
    factory.register(']', field(field_end, true, false));
    factory.register('b', field(field_bit, true, true));
}

#[cfg(test)]
#[path = "../../tests/unit/bricks/register.rs"]
mod tests;
