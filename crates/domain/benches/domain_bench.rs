use catalog::{Product, UnitOfMeasure, Warehouse, WarehouseKind};
use common::Money;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{
    CandidateLine, FranchiseId, OrderLine, OrderService, PlaceOrder, ValidateOrder, build_lines,
    compliance,
};
use event_store::InMemoryEventStore;

fn line_values(n: usize) -> Vec<(WarehouseKind, Money)> {
    (0..n)
        .map(|i| {
            let kind = if i % 5 == 0 {
                WarehouseKind::Independent
            } else {
                WarehouseKind::Company
            };
            (kind, Money::from_cents(100 + i as i64))
        })
        .collect()
}

fn bench_compliance_evaluate(c: &mut Criterion) {
    let values = line_values(50);

    c.bench_function("domain/compliance_evaluate_50_lines", |b| {
        b.iter(|| compliance::evaluate(values.iter().copied()));
    });
}

fn bench_build_lines(c: &mut Criterion) {
    let candidates: Vec<CandidateLine> = (0..20)
        .map(|i| {
            let (warehouse, price) = if i % 5 == 0 {
                (
                    Warehouse::new("W-LYON", "Fournisseur Lyon", WarehouseKind::Independent),
                    Money::from_cents(400),
                )
            } else {
                (
                    Warehouse::new("W-IVRY", "Entrepôt Ivry", WarehouseKind::Company),
                    Money::from_cents(500),
                )
            };
            CandidateLine {
                product: Product::new(
                    format!("SKU-{i:03}"),
                    format!("Product {i}"),
                    price,
                    UnitOfMeasure::Piece,
                ),
                warehouse,
                quantity: 3,
                available: 100,
            }
        })
        .collect();

    c.bench_function("domain/build_lines_20_candidates", |b| {
        b.iter(|| build_lines("12 rue des Halles, 75001 Paris", &candidates).unwrap());
    });
}

fn bench_place_and_validate(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let lines = vec![
        OrderLine::new(
            "SKU-TOMATO",
            "W-IVRY",
            WarehouseKind::Company,
            16,
            Money::from_cents(500),
        ),
        OrderLine::new(
            "SKU-CREAM",
            "W-LYON",
            WarehouseKind::Independent,
            1,
            Money::from_cents(2000),
        ),
    ];

    c.bench_function("domain/place_and_validate", |b| {
        b.iter(|| {
            rt.block_on(async {
                let service = OrderService::new(InMemoryEventStore::new());
                let cmd = PlaceOrder::new(
                    "CMD-20240101-0001",
                    FranchiseId::new(),
                    "12 rue des Halles, 75001 Paris",
                    None,
                    lines.clone(),
                );
                let order_id = cmd.order_id;
                service.place_order(cmd).await.unwrap();
                service
                    .validate_order(ValidateOrder::new(order_id))
                    .await
                    .unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_compliance_evaluate,
    bench_build_lines,
    bench_place_and_validate
);
criterion_main!(benches);
